//! # Schools - Proximity Ranking Library
//!
//! Store schools with their coordinates and list them nearest-first from
//! any reference point.
//!
//! ## Features
//!
//! - **Haversine distance**: great-circle kilometers, rounded to 2 decimals
//! - **Deterministic ranking**: ties on distance are broken by ascending id
//! - **Validation**: field-level errors for names, addresses and coordinates
//! - **SQLite storage**: a single indexed `schools` table behind an explicit handle
//!
//! ## Quick Start
//!
//! ```ignore
//! use schools::{validation, Database, DatabaseConfig, SchoolRepository};
//!
//! let database = Database::connect(&DatabaseConfig::from_env()?).await?;
//! let repository = SchoolRepository::new(database.clone());
//!
//! let body = serde_json::json!({
//!     "name": "Hillside Academy",
//!     "address": "4 Hill Lane, Bath",
//!     "latitude": 51.38,
//!     "longitude": -2.36,
//! });
//! let school = repository.create(&validation::validate_new_school(&body)?).await?;
//!
//! for entry in repository.find_by_proximity(51.5074, -0.1278).await? {
//!     println!("{}: {} km", entry.school.name, entry.distance_km);
//! }
//!
//! database.close().await;
//! ```
//!
//! ## Feature Flags
//!
//! - `geojson`: export ranked lists as GeoJSON feature collections
//! - `openapi`: derive `utoipa` schemas for the public data types

pub mod database;
pub mod distance;
pub mod error;
pub mod ranking;
pub mod repository;
pub mod school;
pub mod validation;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use database::{Database, DatabaseConfig};
pub use distance::distance_km;
pub use error::{Result, SchoolError};
pub use ranking::rank;
pub use repository::SchoolRepository;
pub use school::{Coordinates, NewSchool, RankedSchool, School};
pub use validation::{FieldError, ValidationErrors};
