//! Rank a handful of schools around a reference point.
//!
//! Run with: cargo run --example nearest -- 51.5074 -0.1278

use schools::{Database, DatabaseConfig, NewSchool, SchoolRepository};
use std::env;

#[tokio::main]
async fn main() -> Result<(), schools::SchoolError> {
    let mut args = env::args().skip(1);
    let latitude: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(51.5074);
    let longitude: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(-0.1278);

    // In-memory database, discarded on exit
    let database = Database::connect(&DatabaseConfig::in_memory()).await?;
    let repository = SchoolRepository::new(database.clone());

    let schools = [
        ("Eton College", "Windsor SL4 6DW", 51.4914, -0.6094),
        ("Lycée Henri-IV", "23 Rue Clovis, Paris", 48.8459, 2.3474),
        ("Phillips Exeter Academy", "20 Main St, Exeter, NH", 42.9814, -70.9505),
        ("Gordonstoun", "Elgin IV30 5RF, Scotland", 57.6946, -3.3863),
    ];

    for (name, address, lat, lon) in schools {
        repository
            .create(&NewSchool {
                name: name.to_string(),
                address: address.to_string(),
                latitude: lat,
                longitude: lon,
            })
            .await?;
    }

    println!("Schools nearest to ({}, {}):", latitude, longitude);
    println!("{:-<50}", "");

    for entry in repository.find_by_proximity(latitude, longitude).await? {
        println!("{:>10.2} km  {}", entry.distance_km, entry.school.name);
    }

    database.close().await;
    Ok(())
}
