//! GeoJSON export of ranked schools.
//!
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use schools::geojson::ranked_to_feature_collection;
//!
//! let ranked = repository.find_by_proximity(51.5074, -0.1278).await?;
//! let collection = ranked_to_feature_collection(&ranked);
//! println!("{}", serde_json::to_string(&collection)?);
//! ```

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::json;

use crate::school::RankedSchool;

/// Convert a ranked list into a GeoJSON `FeatureCollection`.
///
/// Each school becomes a `Point` feature in GeoJSON coordinate order
/// (`[longitude, latitude]`). Properties carry `id`, `name`, `address`,
/// `distanceKm` and the 1-based `rank` in the input order.
pub fn ranked_to_feature_collection(ranked: &[RankedSchool]) -> FeatureCollection {
    let features = ranked
        .iter()
        .enumerate()
        .map(|(index, entry)| ranked_to_feature(entry, index + 1))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn ranked_to_feature(entry: &RankedSchool, rank: usize) -> Feature {
    let school = &entry.school;
    let geometry = Geometry::new(GeoJsonValue::Point(vec![school.longitude, school.latitude]));

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(school.id));
    properties.insert("name".to_string(), json!(school.name));
    properties.insert("address".to_string(), json!(school.address));
    properties.insert("distanceKm".to_string(), json!(entry.distance_km));
    properties.insert("rank".to_string(), json!(rank));

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::school::School;
    use chrono::Utc;

    fn ranked(id: i64, latitude: f64, longitude: f64, distance_km: f64) -> RankedSchool {
        let now = Utc::now();
        RankedSchool {
            school: School {
                id,
                name: format!("School {}", id),
                address: "1 Test Street".to_string(),
                latitude,
                longitude,
                created_at: now,
                updated_at: now,
            },
            distance_km,
        }
    }

    #[test]
    fn test_feature_collection() {
        let list = vec![ranked(4, 51.5, -0.12, 0.0), ranked(2, 48.85, 2.35, 343.56)];
        let collection = ranked_to_feature_collection(&list);

        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        match &first.geometry.as_ref().unwrap().value {
            GeoJsonValue::Point(coord) => assert_eq!(coord, &vec![-0.12, 51.5]),
            other => panic!("expected Point, got {:?}", other),
        }

        let props = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(props["id"], 2);
        assert_eq!(props["rank"], 2);
        assert_eq!(props["distanceKm"], 343.56);
    }

    #[test]
    fn test_empty_collection_serializes() {
        let collection = ranked_to_feature_collection(&[]);
        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.contains("FeatureCollection"));
    }
}
