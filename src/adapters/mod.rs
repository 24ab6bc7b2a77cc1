// Adapters layer: concrete implementations for external systems (storage, mail, http).

pub mod http;
pub mod mail;
pub mod store;

pub use http::{router, AppState};
pub use mail::{mail_service_from_config, LocalMailService, WebhookMailService};
pub use store::CityDataStore;
