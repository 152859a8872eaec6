mod settings;

pub use settings::{CompanyConfig, MailerConfig, SalutationConfig, Settings, StoreConfig};
