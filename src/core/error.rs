use std::fmt;
use thiserror::Error;

use crate::domain::model::{CityId, PointOfInterestId};
use crate::domain::patch::PatchError;
use crate::domain::validation::ValidationErrors;
use crate::utils::error::CityInfoError;

/// Which level of the `city -> point of interest` hierarchy was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundLevel {
    City,
    PointOfInterest,
}

impl fmt::Display for NotFoundLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City => write!(f, "city"),
            Self::PointOfInterest => write!(f, "point of interest"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PointOfInterestError {
    #[error("City with id {city_id} wasn't found")]
    CityNotFound { city_id: CityId },

    #[error("Point of interest with id {point_of_interest_id} wasn't found in city {city_id}")]
    PointOfInterestNotFound {
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    },

    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("Patch document could not be applied: {0}")]
    PatchFailed(#[from] PatchError),

    #[error(transparent)]
    Persistence(#[from] CityInfoError),
}

impl PointOfInterestError {
    pub fn not_found_level(&self) -> Option<NotFoundLevel> {
        match self {
            Self::CityNotFound { .. } => Some(NotFoundLevel::City),
            Self::PointOfInterestNotFound { .. } => Some(NotFoundLevel::PointOfInterest),
            _ => None,
        }
    }

    /// Errors caused by the request contents rather than by the system.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

impl From<ValidationErrors> for PointOfInterestError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed(errors)
    }
}
