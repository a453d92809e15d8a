use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Coordinate;

/// Body carrying a position, used to register drivers, move them and request rides
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl LocationRequest {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Request to toggle a driver's availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}
