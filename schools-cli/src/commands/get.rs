use anyhow::{bail, Result};

use super::{open_repository, print_school, DbArgs};

pub async fn run(db: &DbArgs, id: i64, json: bool) -> Result<()> {
    let (database, repository) = open_repository(db).await?;
    let result = repository.find_by_id(id).await;
    database.close().await;

    let Some(school) = result? else {
        bail!("School not found: id={}", id);
    };

    if json {
        println!("{}", serde_json::to_string(&school)?);
    } else {
        print_school(&school);
    }

    Ok(())
}
