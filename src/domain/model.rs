use serde::{Deserialize, Serialize};

pub type CityId = i32;
pub type PointOfInterestId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub id: PointOfInterestId,
    pub name: String,
    pub description: Option<String>,
}

/// Request body for POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreation {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for PUT, and the shape a PATCH document is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    pub id: PointOfInterestId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
}

impl PointOfInterest {
    pub fn from_creation(id: PointOfInterestId, payload: PointOfInterestForCreation) -> Self {
        Self {
            id,
            name: payload.name,
            description: payload.description,
        }
    }

    /// Overwrites the mutable fields; `id` is never touched.
    pub fn apply_update(&mut self, update: PointOfInterestForUpdate) {
        self.name = update.name;
        self.description = update.description;
    }
}

impl From<PointOfInterest> for PointOfInterestDto {
    fn from(point: PointOfInterest) -> Self {
        Self {
            id: point.id,
            name: point.name,
            description: point.description,
        }
    }
}

impl From<City> for CityDto {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            description: city.description,
            number_of_points_of_interest: city.points_of_interest.len(),
            points_of_interest: city
                .points_of_interest
                .into_iter()
                .map(PointOfInterestDto::from)
                .collect(),
        }
    }
}

impl From<City> for CityWithoutPointsOfInterestDto {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            description: city.description,
        }
    }
}

/// Sample data loaded into an empty store.
pub fn sample_cities() -> Vec<City> {
    fn point(id: PointOfInterestId, name: &str, description: &str) -> PointOfInterest {
        PointOfInterest {
            id,
            name: name.to_string(),
            description: Some(description.to_string()),
        }
    }

    vec![
        City {
            id: 1,
            name: "New York City".to_string(),
            description: Some("The one with that big park.".to_string()),
            points_of_interest: vec![
                point(1, "Central Park", "The most visited urban park in the United States."),
                point(2, "Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
            ],
        },
        City {
            id: 2,
            name: "Antwerp".to_string(),
            description: Some("The one with the cathedral that was never really finished.".to_string()),
            points_of_interest: vec![
                point(3, "Cathedral of Our Lady", "A Gothic style cathedral, conceived by architects Jan and Pieter Appelmans."),
                point(4, "Antwerp Central Station", "The finest example of railway architecture in Belgium."),
            ],
        },
        City {
            id: 3,
            name: "Paris".to_string(),
            description: Some("The one with that big tower.".to_string()),
            points_of_interest: vec![
                point(5, "Eiffel Tower", "A wrought iron lattice tower on the Champ de Mars, named after engineer Gustave Eiffel."),
                point(6, "The Louvre", "The world's largest museum."),
            ],
        },
    ]
}
