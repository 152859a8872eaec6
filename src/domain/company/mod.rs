//! Company address-format lookup.
//!
//! This module provides:
//! - `CompanyRecord`: an organization's email-address convention
//! - `CompanyStore`: read-only record store backends (memory, PostgreSQL)
//! - `DisambiguationStrategy`: pluggable policy for multi-record matches
//! - `CompanyFormatResolver`: substring lookup plus disambiguation

mod disambiguation;
mod factory;
mod memory_store;
mod postgres_store;
mod resolver;
mod store;
mod types;

pub use disambiguation::{
    create_strategy, BestMatch, DisambiguationStrategy, FirstMatch, InteractiveSelection,
    RejectAmbiguous,
};
pub use factory::create_company_store;
pub use memory_store::MemoryCompanyStore;
pub use postgres_store::{escape_like, PostgresCompanyStore};
pub use resolver::CompanyFormatResolver;
pub use store::CompanyStore;
pub use types::{CompanyError, CompanyRecord, CompanyStoreError, Resolution};
