//! Recipient names and salutations.

mod name;
mod salutation;

pub use name::{split_name, title_case, NameError, NameParts};
pub use salutation::{
    generate_salutation, salutation_from_parts, FallbackTitle, SalutationPolicy,
};
