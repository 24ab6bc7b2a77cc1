use crate::domain::model::{City, CityId, PointOfInterest, PointOfInterestId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Storage collaborator for cities and their points of interest.
///
/// Mutations are staged until [`CityInfoRepository::save`] commits them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityInfoRepository: Send + Sync {
    async fn city_exists(&self, city_id: CityId) -> Result<bool>;

    /// Every city, ordered by id, with its points of interest.
    async fn get_cities(&self) -> Result<Vec<City>>;

    async fn get_city(&self, city_id: CityId, include_points_of_interest: bool)
        -> Result<Option<City>>;

    async fn get_points_of_interest_for_city(&self, city_id: CityId)
        -> Result<Vec<PointOfInterest>>;

    async fn get_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>>;

    async fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: PointOfInterest,
    ) -> Result<()>;

    async fn update_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: &PointOfInterest,
    ) -> Result<()>;

    async fn delete_point_of_interest(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<()>;

    /// Commits staged changes. A failure discards them.
    async fn save(&self) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailService: Send + Sync {
    async fn send(&self, subject: &str, message: &str) -> Result<()>;
}
