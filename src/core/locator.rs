use std::sync::Arc;

use crate::core::error::{NotFoundLevel, PointOfInterestError};
use crate::domain::model::{City, CityId, PointOfInterest, PointOfInterestId};
use crate::domain::ports::CityInfoRepository;
use crate::utils::error::Result;

/// Outcome of a lookup. Missing resources are values, not errors; the
/// surrounding `Result` only carries store failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located<T> {
    Found(T),
    NotFound(NotFoundLevel),
}

impl<T> Located<T> {
    /// Converts a not-found outcome into the matching service error.
    pub fn or_not_found(
        self,
        city_id: CityId,
        point_of_interest_id: Option<PointOfInterestId>,
    ) -> std::result::Result<T, PointOfInterestError> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound(NotFoundLevel::City) => {
                Err(PointOfInterestError::CityNotFound { city_id })
            }
            Self::NotFound(NotFoundLevel::PointOfInterest) => {
                Err(PointOfInterestError::PointOfInterestNotFound {
                    city_id,
                    point_of_interest_id: point_of_interest_id.unwrap_or_default(),
                })
            }
        }
    }
}

/// Resolves `(city, point of interest)` pairs, always checking the city first.
#[derive(Clone)]
pub struct ResourceLocator {
    repository: Arc<dyn CityInfoRepository>,
}

impl ResourceLocator {
    pub fn new(repository: Arc<dyn CityInfoRepository>) -> Self {
        Self { repository }
    }

    pub async fn locate_city(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
    ) -> Result<Located<City>> {
        match self
            .repository
            .get_city(city_id, include_points_of_interest)
            .await?
        {
            Some(city) => Ok(Located::Found(city)),
            None => {
                tracing::info!(city_id, level = %NotFoundLevel::City, "City with id {} wasn't found", city_id);
                Ok(Located::NotFound(NotFoundLevel::City))
            }
        }
    }

    pub async fn locate_point(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<Located<PointOfInterest>> {
        if let Located::NotFound(level) = self.locate_city(city_id, false).await? {
            return Ok(Located::NotFound(level));
        }

        match self
            .repository
            .get_point_of_interest_for_city(city_id, point_of_interest_id)
            .await?
        {
            Some(point) => Ok(Located::Found(point)),
            None => {
                tracing::info!(
                    city_id,
                    point_of_interest_id,
                    level = %NotFoundLevel::PointOfInterest,
                    "Point of interest with id {} wasn't found in city {}",
                    point_of_interest_id,
                    city_id
                );
                Ok(Located::NotFound(NotFoundLevel::PointOfInterest))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCityInfoRepository;
    use mockall::predicate::*;

    fn city(id: CityId) -> City {
        City {
            id,
            name: format!("City {id}"),
            description: None,
            points_of_interest: vec![],
        }
    }

    fn point(id: PointOfInterestId) -> PointOfInterest {
        PointOfInterest {
            id,
            name: format!("Point {id}"),
            description: None,
        }
    }

    #[tokio::test]
    async fn missing_city_short_circuits_before_point_lookup() {
        let mut repository = MockCityInfoRepository::new();
        repository
            .expect_get_city()
            .with(eq(7), eq(false))
            .times(1)
            .returning(|_, _| Ok(None));
        repository.expect_get_point_of_interest_for_city().never();

        let locator = ResourceLocator::new(Arc::new(repository));
        let located = locator.locate_point(7, 1).await.unwrap();

        assert_eq!(located, Located::NotFound(NotFoundLevel::City));
    }

    #[tokio::test]
    async fn missing_point_in_existing_city() {
        let mut repository = MockCityInfoRepository::new();
        repository
            .expect_get_city()
            .returning(|id, _| Ok(Some(city(id))));
        repository
            .expect_get_point_of_interest_for_city()
            .with(eq(1), eq(99))
            .returning(|_, _| Ok(None));

        let locator = ResourceLocator::new(Arc::new(repository));
        let located = locator.locate_point(1, 99).await.unwrap();

        assert_eq!(located, Located::NotFound(NotFoundLevel::PointOfInterest));
        let err = located.or_not_found(1, Some(99)).unwrap_err();
        assert_eq!(err.not_found_level(), Some(NotFoundLevel::PointOfInterest));
    }

    #[tokio::test]
    async fn found_point_is_returned() {
        let mut repository = MockCityInfoRepository::new();
        repository
            .expect_get_city()
            .returning(|id, _| Ok(Some(city(id))));
        repository
            .expect_get_point_of_interest_for_city()
            .returning(|_, id| Ok(Some(point(id))));

        let locator = ResourceLocator::new(Arc::new(repository));
        let located = locator.locate_point(1, 2).await.unwrap();

        assert_eq!(located, Located::Found(point(2)));
    }

    #[tokio::test]
    async fn store_failure_is_an_error_not_a_miss() {
        let mut repository = MockCityInfoRepository::new();
        repository
            .expect_get_city()
            .returning(|_, _| Err(crate::utils::error::CityInfoError::persistence("disk gone")));

        let locator = ResourceLocator::new(Arc::new(repository));
        assert!(locator.locate_city(1, false).await.is_err());
    }
}
