pub mod error;
pub mod locator;
pub mod points_of_interest;

pub use crate::domain::ports::{CityInfoRepository, MailService};
pub use error::{NotFoundLevel, PointOfInterestError};
pub use locator::{Located, ResourceLocator};
pub use points_of_interest::{PointsOfInterestService, ServiceResult};
