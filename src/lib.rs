// Infrastructure layer (shared components)
pub mod infrastructure;

// Re-export infrastructure modules at the crate root
pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;
pub use infrastructure::postgres;

// Domain layer (business logic)
pub mod domain;

pub use domain::address;
pub use domain::company;
pub use domain::delivery;
pub use domain::input;
pub use domain::person;
pub use domain::template;

// Application layer
pub mod pipeline;

// Supporting modules
pub mod telemetry;
