use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::error::PointOfInterestError;
use crate::core::locator::ResourceLocator;
use crate::domain::model::{
    City, CityId, PointOfInterest, PointOfInterestForCreation, PointOfInterestForUpdate,
    PointOfInterestId,
};
use crate::domain::patch::{PatchDocument, PointOfInterestPatchTarget};
use crate::domain::ports::{CityInfoRepository, MailService};
use crate::domain::validation::ValidatePayload;
use crate::utils::error::CityInfoError;

pub type ServiceResult<T> = std::result::Result<T, PointOfInterestError>;

pub const DELETED_SUBJECT: &str = "Point of interest deleted.";

/// Reads and mutates points of interest.
///
/// Write paths run inside one async mutex: the `max + 1` id generation and
/// every locate, validate, mutate, commit sequence are serialized. Every write
/// checks existence (city, then point) before validating the payload.
pub struct PointsOfInterestService {
    repository: Arc<dyn CityInfoRepository>,
    mail_service: Arc<dyn MailService>,
    locator: ResourceLocator,
    write_lock: Mutex<()>,
}

impl PointsOfInterestService {
    pub fn new(repository: Arc<dyn CityInfoRepository>, mail_service: Arc<dyn MailService>) -> Self {
        Self {
            locator: ResourceLocator::new(repository.clone()),
            repository,
            mail_service,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list_cities(&self) -> ServiceResult<Vec<City>> {
        Ok(self.repository.get_cities().await?)
    }

    pub async fn get_city(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
    ) -> ServiceResult<City> {
        self.locator
            .locate_city(city_id, include_points_of_interest)
            .await?
            .or_not_found(city_id, None)
    }

    pub async fn list_points_of_interest(
        &self,
        city_id: CityId,
    ) -> ServiceResult<Vec<PointOfInterest>> {
        self.locator
            .locate_city(city_id, false)
            .await?
            .or_not_found(city_id, None)?;

        Ok(self
            .repository
            .get_points_of_interest_for_city(city_id)
            .await?)
    }

    pub async fn get_point_of_interest(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> ServiceResult<PointOfInterest> {
        self.locator
            .locate_point(city_id, point_of_interest_id)
            .await?
            .or_not_found(city_id, Some(point_of_interest_id))
    }

    /// Creates a point of interest. Its id is one above the highest id held by
    /// any city, not just the owning one.
    pub async fn create_point_of_interest(
        &self,
        city_id: CityId,
        payload: PointOfInterestForCreation,
    ) -> ServiceResult<PointOfInterest> {
        let _guard = self.write_lock.lock().await;

        self.locator
            .locate_city(city_id, false)
            .await?
            .or_not_found(city_id, None)?;

        if let Err(errors) = payload.validate_payload() {
            tracing::warn!(city_id, %errors, "Rejected point of interest creation");
            return Err(errors.into());
        }

        let id = self.next_point_of_interest_id().await?;
        let point = PointOfInterest::from_creation(id, payload);

        self.repository
            .add_point_of_interest_for_city(city_id, point.clone())
            .await?;
        self.commit("creating a point of interest").await?;

        tracing::info!(city_id, point_of_interest_id = id, "Created point of interest");
        Ok(point)
    }

    pub async fn update_point_of_interest(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
        payload: PointOfInterestForUpdate,
    ) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut point = self
            .locator
            .locate_point(city_id, point_of_interest_id)
            .await?
            .or_not_found(city_id, Some(point_of_interest_id))?;

        if let Err(errors) = payload.validate_payload() {
            tracing::warn!(city_id, point_of_interest_id, %errors, "Rejected point of interest update");
            return Err(errors.into());
        }

        point.apply_update(payload);
        self.repository
            .update_point_of_interest_for_city(city_id, &point)
            .await?;
        self.commit("updating a point of interest").await
    }

    /// Applies `document` to a snapshot of the stored point and writes it back
    /// only when every operation applied and the snapshot validates.
    pub async fn partially_update_point_of_interest(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
        document: &PatchDocument,
    ) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut point = self
            .locator
            .locate_point(city_id, point_of_interest_id)
            .await?
            .or_not_found(city_id, Some(point_of_interest_id))?;

        let mut snapshot = PointOfInterestPatchTarget::from(&point);
        if let Err(e) = document.apply_to(&mut snapshot) {
            tracing::warn!(city_id, point_of_interest_id, error = %e, "Rejected patch document");
            return Err(e.into());
        }

        let update = match snapshot.into_validated_update() {
            Ok(update) => update,
            Err(errors) => {
                tracing::warn!(city_id, point_of_interest_id, %errors, "Patched point of interest is invalid");
                return Err(errors.into());
            }
        };

        point.apply_update(update);
        self.repository
            .update_point_of_interest_for_city(city_id, &point)
            .await?;
        self.commit("patching a point of interest").await
    }

    /// Deletes the point and, once the deletion is committed, sends exactly
    /// one notification naming it.
    pub async fn delete_point_of_interest(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> ServiceResult<()> {
        let deleted = {
            let _guard = self.write_lock.lock().await;

            let point = self
                .locator
                .locate_point(city_id, point_of_interest_id)
                .await?
                .or_not_found(city_id, Some(point_of_interest_id))?;

            self.repository
                .delete_point_of_interest(city_id, point.id)
                .await?;
            self.commit("deleting a point of interest").await?;
            point
        };

        let message = format!(
            "Point of interest {} with id {} deleted.",
            deleted.name, deleted.id
        );
        if let Err(e) = self.mail_service.send(DELETED_SUBJECT, &message).await {
            // 刪除已提交，通知失敗不回滾
            tracing::error!(
                city_id,
                point_of_interest_id,
                error = %e,
                "Failed to send deletion notification"
            );
        }

        tracing::info!(city_id, point_of_interest_id, "Deleted point of interest");
        Ok(())
    }

    /// Must be called while holding `write_lock`.
    async fn next_point_of_interest_id(&self) -> ServiceResult<PointOfInterestId> {
        let max_id = self
            .repository
            .get_cities()
            .await?
            .iter()
            .flat_map(|city| city.points_of_interest.iter())
            .map(|point| point.id)
            .max()
            .unwrap_or(0);

        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| CityInfoError::persistence("point of interest id space exhausted"))?;
        Ok(next_id)
    }

    async fn commit(&self, action: &str) -> ServiceResult<()> {
        self.repository.save().await.map_err(|e| {
            tracing::error!(error = %e, "Saving changes failed while {}", action);
            PointOfInterestError::Persistence(e)
        })
    }
}
