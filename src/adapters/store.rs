use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::domain::model::{sample_cities, City, CityId, PointOfInterest, PointOfInterestId};
use crate::domain::ports::CityInfoRepository;
use crate::utils::error::{CityInfoError, Result};

#[derive(Debug, Default)]
struct StoreState {
    committed: Vec<City>,
    // 尚未 save 的變更
    staged: Option<Vec<City>>,
}

impl StoreState {
    fn staged_mut(&mut self) -> &mut Vec<City> {
        let committed = &self.committed;
        self.staged.get_or_insert_with(|| committed.clone())
    }

    fn city_mut(&mut self, city_id: CityId) -> Result<&mut City> {
        self.staged_mut()
            .iter_mut()
            .find(|city| city.id == city_id)
            .ok_or_else(|| CityInfoError::persistence(format!("city {} does not exist", city_id)))
    }
}

/// In-process city store with an optional JSON snapshot on disk.
///
/// Mutations are staged and reads only see committed data; `save` writes the
/// snapshot (when configured) and promotes the staged changes, or drops them
/// if the write fails.
#[derive(Debug)]
pub struct CityDataStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl CityDataStore {
    pub fn in_memory(cities: Vec<City>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                committed: cities,
                staged: None,
            }),
            snapshot_path: None,
        }
    }

    pub fn with_snapshot(cities: Vec<City>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(snapshot_path.into()),
            ..Self::in_memory(cities)
        }
    }

    /// Builds the store described by `config`, loading the snapshot when one
    /// exists and seeding otherwise.
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        let seed = || {
            if config.seed_sample_data {
                sample_cities()
            } else {
                Vec::new()
            }
        };

        let Some(path) = config.snapshot_path.as_deref().map(PathBuf::from) else {
            tracing::info!("Using in-memory city store");
            return Ok(Self::in_memory(seed()));
        };

        if config.reset_on_startup && path.exists() {
            tracing::warn!("Resetting city store, removing {}", path.display());
            tokio::fs::remove_file(&path).await?;
        }

        if path.exists() {
            let cities = read_snapshot(&path).await?;
            tracing::info!(
                "Loaded {} cities from {}",
                cities.len(),
                path.display()
            );
            return Ok(Self::with_snapshot(cities, path));
        }

        let cities = seed();
        write_snapshot(&path, &cities).await?;
        tracing::info!("Created city store at {}", path.display());
        Ok(Self::with_snapshot(cities, path))
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub async fn has_pending_changes(&self) -> bool {
        self.state.read().await.staged.is_some()
    }
}

async fn read_snapshot(path: &Path) -> Result<Vec<City>> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        CityInfoError::persistence(format!("failed to read {}: {}", path.display(), e))
    })?;
    let mut cities: Vec<City> = serde_json::from_slice(&data)?;
    cities.sort_by_key(|city| city.id);
    Ok(cities)
}

async fn write_snapshot(path: &Path, cities: &[City]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            CityInfoError::persistence(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }

    let data = serde_json::to_vec_pretty(cities)?;
    tokio::fs::write(path, data).await.map_err(|e| {
        CityInfoError::persistence(format!("failed to write {}: {}", path.display(), e))
    })
}

#[async_trait]
impl CityInfoRepository for CityDataStore {
    async fn city_exists(&self, city_id: CityId) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.committed.iter().any(|city| city.id == city_id))
    }

    async fn get_cities(&self) -> Result<Vec<City>> {
        let state = self.state.read().await;
        let mut cities = state.committed.to_vec();
        cities.sort_by_key(|city| city.id);
        Ok(cities)
    }

    async fn get_city(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
    ) -> Result<Option<City>> {
        let state = self.state.read().await;
        Ok(state
            .committed
            .iter()
            .find(|city| city.id == city_id)
            .map(|city| {
                let mut city = city.clone();
                if !include_points_of_interest {
                    city.points_of_interest.clear();
                }
                city
            }))
    }

    async fn get_points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>> {
        let state = self.state.read().await;
        Ok(state
            .committed
            .iter()
            .find(|city| city.id == city_id)
            .map(|city| city.points_of_interest.clone())
            .unwrap_or_default())
    }

    async fn get_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>> {
        let state = self.state.read().await;
        Ok(state
            .committed
            .iter()
            .find(|city| city.id == city_id)
            .and_then(|city| {
                city.points_of_interest
                    .iter()
                    .find(|point| point.id == point_of_interest_id)
                    .cloned()
            }))
    }

    async fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: PointOfInterest,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.city_mut(city_id)?.points_of_interest.push(point_of_interest);
        Ok(())
    }

    async fn update_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: &PointOfInterest,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let stored = state
            .city_mut(city_id)?
            .points_of_interest
            .iter_mut()
            .find(|point| point.id == point_of_interest.id)
            .ok_or_else(|| {
                CityInfoError::persistence(format!(
                    "point of interest {} does not exist in city {}",
                    point_of_interest.id, city_id
                ))
            })?;
        *stored = point_of_interest.clone();
        Ok(())
    }

    async fn delete_point_of_interest(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let points = &mut state.city_mut(city_id)?.points_of_interest;
        let before = points.len();
        points.retain(|point| point.id != point_of_interest_id);
        if points.len() == before {
            return Err(CityInfoError::persistence(format!(
                "point of interest {} does not exist in city {}",
                point_of_interest_id, city_id
            )));
        }
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(staged) = state.staged.take() else {
            return Ok(());
        };

        if let Some(path) = &self.snapshot_path {
            // staged 已取出，寫入失敗即等同回滾
            write_snapshot(path, &staged).await?;
            tracing::debug!("Wrote city snapshot to {}", path.display());
        }

        state.committed = staged;
        Ok(())
    }
}
