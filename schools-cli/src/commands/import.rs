use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use schools::validation::validate_new_school;
use schools::SchoolRepository;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use super::{describe_errors, open_repository, DbArgs};

/// CSV column names for each school field.
pub struct Columns {
    pub name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

/// Outcome of an import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: u64,
    /// Rows rejected by validation, as (CSV line, reason).
    pub skipped: Vec<(u64, String)>,
}

pub async fn run(db: &DbArgs, input: PathBuf, columns: Columns) -> Result<()> {
    let file = File::open(&input).context("Failed to open input file")?;

    let (database, repository) = open_repository(db).await?;
    let result = import_csv(&repository, BufReader::new(file), &columns, true).await;
    database.close().await;
    let report = result?;

    for (line, reason) in &report.skipped {
        eprintln!("Skipped line {}:\n{}", line, reason);
    }
    println!(
        "Imported {} schools, skipped {}",
        report.imported,
        report.skipped.len()
    );
    Ok(())
}

/// Validate and insert every row of a CSV stream.
///
/// Invalid rows are skipped and reported; a storage failure aborts the import.
pub async fn import_csv<R: Read>(
    repository: &SchoolRepository,
    reader: R,
    columns: &Columns,
    progress: bool,
) -> Result<ImportReport> {
    let mut reader = csv::Reader::from_reader(reader);

    // Find column indices
    let headers = reader.headers()?.clone();
    let index_of = |col: &str| {
        headers
            .iter()
            .position(|h| h.trim() == col)
            .with_context(|| format!("Column '{}' not found in CSV", col))
    };
    let fields = [
        ("name", index_of(&columns.name)?),
        ("address", index_of(&columns.address)?),
        ("latitude", index_of(&columns.latitude)?),
        ("longitude", index_of(&columns.longitude)?),
    ];

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    let pb = if progress {
        ProgressBar::new(records.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut report = ImportReport::default();

    for (row, record) in records.iter().enumerate() {
        // Header is line 1
        let line = row as u64 + 2;

        let mut body = Map::new();
        for (field, idx) in fields {
            if let Some(value) = record.get(idx) {
                body.insert(field.to_string(), Value::String(value.to_string()));
            }
        }

        match validate_new_school(&Value::Object(body)) {
            Ok(school) => {
                repository
                    .create(&school)
                    .await
                    .with_context(|| format!("Failed to store school on line {}", line))?;
                report.imported += 1;
            }
            Err(errors) => report.skipped.push((line, describe_errors(&errors))),
        }

        pb.inc(1);
    }

    pb.finish_with_message("done");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schools::{Database, DatabaseConfig};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn default_columns() -> Columns {
        Columns {
            name: "name".to_string(),
            address: "address".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }

    async fn repository() -> SchoolRepository {
        let database = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        SchoolRepository::new(database)
    }

    #[tokio::test]
    async fn test_import_valid_and_invalid_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,address,latitude,longitude").unwrap();
        writeln!(file, "Hillside Academy,4 Hill Lane Bath,51.38,-2.36").unwrap();
        writeln!(file, "X,Nowhere Road,95,0").unwrap();
        writeln!(file, "Harbour School,9 Quay Street Bristol,51.45,-2.59").unwrap();
        file.flush().unwrap();

        let repo = repository().await;
        let input = File::open(file.path()).unwrap();
        let report = import_csv(&repo, input, &default_columns(), false)
            .await
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, 3);
        assert!(report.skipped[0].1.contains("latitude"));
        assert!(report.skipped[0].1.contains("name"));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_import_custom_columns() {
        let csv = "school,street,lat,lng\nRiverside Primary,12 River Road Leeds,53.8,-1.55\n";
        let columns = Columns {
            name: "school".to_string(),
            address: "street".to_string(),
            latitude: "lat".to_string(),
            longitude: "lng".to_string(),
        };

        let repo = repository().await;
        let report = import_csv(&repo, csv.as_bytes(), &columns, false)
            .await
            .unwrap();

        assert_eq!(report.imported, 1);
        let school = &repo.find_all().await.unwrap()[0];
        assert_eq!(school.name, "Riverside Primary");
        assert_eq!(school.latitude, 53.8);
    }

    #[tokio::test]
    async fn test_import_missing_column() {
        let csv = "name,address,latitude\nA School,1 Road Town,10\n";
        let repo = repository().await;

        let err = import_csv(&repo, csv.as_bytes(), &default_columns(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }
}
