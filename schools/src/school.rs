//! School records and the shapes derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct School {
    /// Storage-assigned identifier.
    pub id: i64,
    /// School name (2-255 characters).
    pub name: String,
    /// Postal address (5-500 characters).
    pub address: String,
    /// Latitude in decimal degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub longitude: f64,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (UTC).
    pub updated_at: DateTime<Utc>,
}

impl School {
    /// Location of this school.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A validated payload for creating a school.
///
/// Built by [`crate::validation::validate_new_school`]; fields are trimmed and
/// coordinates are within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewSchool {
    /// School name (2-255 characters).
    pub name: String,
    /// Postal address (5-500 characters).
    pub address: String,
    /// Latitude in decimal degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub longitude: f64,
}

/// A school annotated with its distance from a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RankedSchool {
    #[serde(flatten)]
    pub school: School,
    /// Great-circle distance in kilometers, rounded to 2 decimal places.
    pub distance_km: f64,
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rounded great-circle distance to another point, in kilometers.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        crate::distance::distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn school() -> School {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        School {
            id: 7,
            name: "Riverside Primary".to_string(),
            address: "12 River Road, Leeds".to_string(),
            latitude: 53.8,
            longitude: -1.55,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_school_serializes_camel_case() {
        let json = serde_json::to_value(school()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Riverside Primary");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2024-01-15T09:30:00"));
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_ranked_school_flattens_fields() {
        let ranked = RankedSchool {
            school: school(),
            distance_km: 12.34,
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["distanceKm"], 12.34);
        assert_eq!(json["latitude"], 53.8);
        assert!(json.get("school").is_none());
    }

    #[test]
    fn test_coordinates_distance() {
        let a = Coordinates::new(0.0, 0.0);
        assert_eq!(a.distance_to(&a), 0.0);
        assert_eq!(school().coordinates(), Coordinates::new(53.8, -1.55));
    }
}
