pub mod add;
pub mod distance;
pub mod get;
pub mod import;
pub mod nearby;

use anyhow::{Context, Result};
use schools::{Database, DatabaseConfig, School, SchoolRepository, ValidationErrors};

/// Database settings shared by every subcommand that touches storage.
pub struct DbArgs {
    pub url: String,
    pub max_connections: u32,
}

/// Open the database and wrap it in a repository.
pub async fn open_repository(db: &DbArgs) -> Result<(Database, SchoolRepository)> {
    let config = DatabaseConfig::new(&db.url).max_connections(db.max_connections);
    let database = Database::connect(&config)
        .await
        .with_context(|| format!("Failed to open database {}", db.url))?;
    let repository = SchoolRepository::new(database.clone());
    Ok((database, repository))
}

/// One line per failing field, e.g. `latitude: Latitude must be between -90 and 90`.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    errors
        .errors()
        .iter()
        .map(|e| format!("  {}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_school(school: &School) {
    println!("id:        {}", school.id);
    println!("name:      {}", school.name);
    println!("address:   {}", school.address);
    println!("latitude:  {}", school.latitude);
    println!("longitude: {}", school.longitude);
    println!("created:   {}", school.created_at.to_rfc3339());
}
