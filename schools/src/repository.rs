//! Persistence of school records.

use chrono::Utc;

use crate::database::Database;
use crate::error::Result;
use crate::ranking::rank;
use crate::school::{NewSchool, RankedSchool, School};

const SQL_INSERT_SCHOOL: &str = r#"
INSERT INTO schools (name, address, latitude, longitude, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?)
RETURNING id, name, address, latitude, longitude, created_at, updated_at
"#;

const SQL_LIST_SCHOOLS: &str = r#"
SELECT id, name, address, latitude, longitude, created_at, updated_at
FROM schools
ORDER BY id ASC
"#;

const SQL_GET_SCHOOL: &str = r#"
SELECT id, name, address, latitude, longitude, created_at, updated_at
FROM schools
WHERE id = ?
"#;

const SQL_COUNT_SCHOOLS: &str = "SELECT COUNT(*) FROM schools";

/// Stateless access to the `schools` table over an injected [`Database`].
///
/// # Example
///
/// ```ignore
/// use schools::{Database, DatabaseConfig, SchoolRepository};
///
/// let database = Database::connect(&DatabaseConfig::in_memory()).await?;
/// let repository = SchoolRepository::new(database);
///
/// let nearest = repository.find_by_proximity(51.5074, -0.1278).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SchoolRepository {
    database: Database,
}

impl SchoolRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// The storage handle this repository writes to.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Insert a validated school and return the stored record.
    ///
    /// `created_at` and `updated_at` are both set to the current time.
    pub async fn create(&self, school: &NewSchool) -> Result<School> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, School>(SQL_INSERT_SCHOOL)
            .bind(&school.name)
            .bind(&school.address)
            .bind(school.latitude)
            .bind(school.longitude)
            .bind(now)
            .bind(now)
            .fetch_one(self.database.pool())
            .await?;

        tracing::debug!(id = created.id, name = %created.name, "School created");
        Ok(created)
    }

    /// All stored schools, ordered by id.
    pub async fn find_all(&self) -> Result<Vec<School>> {
        let schools = sqlx::query_as::<_, School>(SQL_LIST_SCHOOLS)
            .fetch_all(self.database.pool())
            .await?;
        Ok(schools)
    }

    /// Look up a school by id. Returns `Ok(None)` if no row matches.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<School>> {
        let school = sqlx::query_as::<_, School>(SQL_GET_SCHOOL)
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?;
        Ok(school)
    }

    /// Every stored school ranked nearest-first from the given point.
    pub async fn find_by_proximity(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<RankedSchool>> {
        let schools = self.find_all().await?;
        Ok(rank(latitude, longitude, schools))
    }

    /// Number of stored schools.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(SQL_COUNT_SCHOOLS)
            .fetch_one(self.database.pool())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use crate::error::SchoolError;

    async fn repository() -> SchoolRepository {
        let database = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        SchoolRepository::new(database)
    }

    fn new_school(name: &str, latitude: f64, longitude: f64) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            address: format!("1 {} Road", name),
            latitude,
            longitude,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = repository().await;

        let first = repo.create(&new_school("Alpha", 10.0, 20.0)).await.unwrap();
        let second = repo.create(&new_school("Beta", -10.0, -20.0)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.name, "Alpha");
        assert_eq!(first.address, "1 Alpha Road");
        assert_eq!(first.latitude, 10.0);
        assert_eq!(first.longitude, 20.0);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_find_all_and_count() {
        let repo = repository().await;
        assert!(repo.find_all().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&new_school("Alpha", 1.0, 1.0)).await.unwrap();
        repo.create(&new_school("Beta", 2.0, 2.0)).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Alpha");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = repository().await;
        let created = repo.create(&new_school("Alpha", 1.0, 1.0)).await.unwrap();

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));

        assert_eq!(repo.find_by_id(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_proximity() {
        let repo = repository().await;
        assert!(repo.find_by_proximity(0.0, 0.0).await.unwrap().is_empty());

        repo.create(&new_school("Far", 40.0, 40.0)).await.unwrap();
        repo.create(&new_school("Here", 0.0, 0.0)).await.unwrap();
        repo.create(&new_school("Near", 1.0, 1.0)).await.unwrap();

        let ranked = repo.find_by_proximity(0.0, 0.0).await.unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.school.name.as_str()).collect();
        assert_eq!(names, vec!["Here", "Near", "Far"]);
        assert_eq!(ranked[0].distance_km, 0.0);
    }

    #[tokio::test]
    async fn test_closed_database_is_storage_error() {
        let repo = repository().await;
        repo.database().close().await;

        let err = repo.find_all().await.unwrap_err();
        assert!(matches!(err, SchoolError::Storage(_)));

        let err = repo.create(&new_school("Alpha", 1.0, 1.0)).await.unwrap_err();
        assert!(matches!(err, SchoolError::Storage(_)));
    }
}
