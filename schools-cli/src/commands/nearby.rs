use anyhow::{bail, Result};
use schools::geojson::ranked_to_feature_collection;
use schools::validation::validate_coordinates;

use super::{open_repository, DbArgs};

pub async fn run(db: &DbArgs, lat: f64, lon: f64, json: bool, geojson: bool) -> Result<()> {
    let location = match validate_coordinates(Some(&lat.to_string()), Some(&lon.to_string())) {
        Ok(location) => location,
        Err(errors) => bail!("Invalid reference point: {}", errors),
    };

    let (database, repository) = open_repository(db).await?;
    let result = repository
        .find_by_proximity(location.latitude, location.longitude)
        .await;
    database.close().await;
    let ranked = result?;

    if geojson {
        let collection = ranked_to_feature_collection(&ranked);
        println!("{}", serde_json::to_string_pretty(&collection)?);
    } else if json {
        println!("{}", serde_json::to_string(&ranked)?);
    } else if ranked.is_empty() {
        println!("No schools stored");
    } else {
        println!("{:>4}  {:>10}  {:<6}  NAME", "#", "KM", "ID");
        for (index, entry) in ranked.iter().enumerate() {
            println!(
                "{:>4}  {:>10.2}  {:<6}  {}",
                index + 1,
                entry.distance_km,
                entry.school.id,
                entry.school.name
            );
        }
    }

    Ok(())
}
