use anyhow::{bail, Result};
use schools::validation::validate_new_school;
use serde_json::json;

use super::{describe_errors, open_repository, print_school, DbArgs};

pub async fn run(
    db: &DbArgs,
    name: String,
    address: String,
    lat: f64,
    lon: f64,
    json: bool,
) -> Result<()> {
    // Same rules as the HTTP endpoint
    let body = json!({
        "name": name,
        "address": address,
        "latitude": lat,
        "longitude": lon,
    });
    let new_school = match validate_new_school(&body) {
        Ok(school) => school,
        Err(errors) => bail!("Invalid school:\n{}", describe_errors(&errors)),
    };

    let (database, repository) = open_repository(db).await?;
    let result = repository.create(&new_school).await;
    database.close().await;
    let school = result?;

    if json {
        println!("{}", serde_json::to_string(&school)?);
    } else {
        println!("School added successfully");
        print_school(&school);
    }

    Ok(())
}
