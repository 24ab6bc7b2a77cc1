pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::AppConfig;

pub use adapters::{CityDataStore, LocalMailService, WebhookMailService};
pub use core::{PointOfInterestError, PointsOfInterestService};
pub use utils::error::{CityInfoError, Result};
