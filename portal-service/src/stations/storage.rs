use sqlx::{postgres::PgRow, PgPool, Row};
use thiserror::Error;

use super::{SocialLinks, Station, StationRecord};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Database(sqlx::Error),
    #[error("{0}")]
    InvalidData(String),
    #[error("{0}")]
    Conflict(String),
    #[error("station `{0}` does not exist")]
    MissingStation(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Conflict(db.message().to_string())
            }
            _ => StorageError::Database(err),
        }
    }
}

/// Maps a foreign key violation on `station_id` into `MissingStation`.
pub(crate) fn missing_station_on_fk(
    station_id: &str,
) -> impl FnOnce(sqlx::Error) -> StorageError + '_ {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StorageError::MissingStation(station_id.to_string())
        }
        _ => StorageError::from(err),
    }
}

const STATION_COLUMNS: &str =
    "id, name, url, image, description, region, city, active, created_at, updated_at";

#[derive(Clone)]
pub struct StationStorage {
    pool: PgPool,
}

impl StationStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active: Option<bool>) -> Result<Vec<Station>, StorageError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {STATION_COLUMNS}
            FROM stations
            WHERE ($1::BOOLEAN IS NULL OR active = $1)
            ORDER BY name ASC
            "#
        ))
        .bind(active)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_station).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<Station>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {STATION_COLUMNS} FROM stations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_station).transpose()
    }

    pub async fn create(&self, record: &StationRecord) -> Result<Station, StorageError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO stations (id, name, url, image, description, region, city, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.url)
        .bind(&record.image)
        .bind(&record.description)
        .bind(&record.region)
        .bind(&record.city)
        .bind(record.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match StorageError::from(err) {
            StorageError::Conflict(_) => {
                StorageError::Conflict(format!("station `{}` already exists", record.id))
            }
            other => other,
        })?;

        row_to_station(row)
    }

    /// Replaces every mutable field. Returns `None` when the station is missing.
    pub async fn update(&self, record: &StationRecord) -> Result<Option<Station>, StorageError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE stations
            SET name = $2,
                url = $3,
                image = $4,
                description = $5,
                region = $6,
                city = $7,
                active = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.url)
        .bind(&record.image)
        .bind(&record.description)
        .bind(&record.region)
        .bind(&record.city)
        .bind(record.active)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_station).transpose()
    }

    /// Soft delete. Returns whether a row matched.
    pub async fn deactivate(&self, id: &str) -> Result<bool, StorageError> {
        let result =
            sqlx::query("UPDATE stations SET active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Programs, social links and live metadata go with the
    /// station through `ON DELETE CASCADE`.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM stations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM stations WHERE active")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    pub async fn count_all(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM stations")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    pub async fn active_ids(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT id FROM stations WHERE active ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| row.try_get("id").map_err(StorageError::from))
            .collect()
    }

    pub async fn social_links(
        &self,
        station_id: &str,
    ) -> Result<Option<SocialLinks>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT station_id, facebook, youtube, tiktok, instagram, twitter
            FROM social_links
            WHERE station_id = $1
            "#,
        )
        .bind(station_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_social_links).transpose()
    }

    pub async fn upsert_social_links(
        &self,
        links: &SocialLinks,
    ) -> Result<SocialLinks, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO social_links (station_id, facebook, youtube, tiktok, instagram, twitter)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (station_id) DO UPDATE SET
                facebook = EXCLUDED.facebook,
                youtube = EXCLUDED.youtube,
                tiktok = EXCLUDED.tiktok,
                instagram = EXCLUDED.instagram,
                twitter = EXCLUDED.twitter,
                updated_at = NOW()
            RETURNING station_id, facebook, youtube, tiktok, instagram, twitter
            "#,
        )
        .bind(&links.station_id)
        .bind(&links.facebook)
        .bind(&links.youtube)
        .bind(&links.tiktok)
        .bind(&links.instagram)
        .bind(&links.twitter)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_station_on_fk(&links.station_id))?;

        row_to_social_links(row)
    }
}

fn row_to_station(row: PgRow) -> Result<Station, StorageError> {
    let id: String = row.try_get("id")?;
    let url: String = row.try_get("url")?;
    if url.trim().is_empty() {
        return Err(StorageError::InvalidData(format!(
            "station `{id}` has an empty stream url"
        )));
    }

    Ok(Station {
        id,
        name: row.try_get("name")?,
        url,
        image: row.try_get("image")?,
        description: row.try_get("description")?,
        region: row.try_get("region")?,
        city: row.try_get("city")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_social_links(row: PgRow) -> Result<SocialLinks, StorageError> {
    Ok(SocialLinks {
        station_id: row.try_get("station_id")?,
        facebook: row.try_get("facebook")?,
        youtube: row.try_get("youtube")?,
        tiktok: row.try_get("tiktok")?,
        instagram: row.try_get("instagram")?,
        twitter: row.try_get("twitter")?,
    })
}
