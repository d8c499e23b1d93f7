use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::schedule::{parse_time_of_day, time_of_day};
use crate::stations::{
    is_valid_station_id, missing_station_on_fk, normalize, optional, StorageError,
};

const MAX_NAME_LENGTH: usize = 255;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Operator override for what is on air. Supersedes the timetable whenever
/// `program_name` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetadata {
    pub station_id: String,
    pub program_name: Option<String>,
    pub host: Option<String>,
    pub description: Option<String>,
    #[serde(with = "time_of_day::option", default)]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "time_of_day::option", default)]
    pub end_time: Option<NaiveTime>,
    pub listeners_count: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveMetadataRecord {
    pub station_id: String,
    pub program_name: Option<String>,
    pub host: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub listeners_count: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetadataPayload {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub listeners_count: Option<i64>,
}

impl LiveMetadataPayload {
    pub fn validate(self) -> Result<LiveMetadataRecord, Vec<String>> {
        let mut errors = Vec::new();

        let station_id = match normalize(self.station_id) {
            Some(id) if is_valid_station_id(&id) => Some(id),
            Some(_) => {
                errors.push("stationId is not a valid station id".into());
                None
            }
            None => {
                errors.push("stationId is required".into());
                None
            }
        };
        let program_name = optional(
            self.program_name,
            "programName",
            MAX_NAME_LENGTH,
            &mut errors,
        );
        let host = optional(self.host, "host", MAX_NAME_LENGTH, &mut errors);
        let description = optional(
            self.description,
            "description",
            MAX_DESCRIPTION_LENGTH,
            &mut errors,
        );
        let mut time = |value: Option<String>, field: &str| {
            let raw = normalize(value)?;
            let parsed = parse_time_of_day(&raw);
            if parsed.is_none() {
                errors.push(format!("{field} must be a time of day as HH:MM"));
            }
            parsed
        };
        let start_time = time(self.start_time, "startTime");
        let end_time = time(self.end_time, "endTime");
        let listeners_count = match self.listeners_count.unwrap_or(0) {
            count if (0..=i64::from(i32::MAX)).contains(&count) => count as i32,
            _ => {
                errors.push("listenersCount must be a non-negative integer".into());
                0
            }
        };

        match station_id {
            Some(station_id) if errors.is_empty() => Ok(LiveMetadataRecord {
                station_id,
                program_name,
                host,
                description,
                start_time,
                end_time,
                listeners_count,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Clone)]
pub struct LiveMetadataStorage {
    pool: PgPool,
}

impl LiveMetadataStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, station_id: &str) -> Result<Option<LiveMetadata>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT station_id, program_name, host, description, start_time, end_time,
                   listeners_count, updated_at
            FROM live_metadata
            WHERE station_id = $1
            "#,
        )
        .bind(station_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_live_metadata).transpose()
    }

    /// Inserts or replaces the station's single override row.
    pub async fn upsert(&self, record: &LiveMetadataRecord) -> Result<LiveMetadata, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO live_metadata
                (station_id, program_name, host, description, start_time, end_time, listeners_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (station_id) DO UPDATE SET
                program_name = EXCLUDED.program_name,
                host = EXCLUDED.host,
                description = EXCLUDED.description,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                listeners_count = EXCLUDED.listeners_count,
                updated_at = NOW()
            RETURNING station_id, program_name, host, description, start_time, end_time,
                      listeners_count, updated_at
            "#,
        )
        .bind(&record.station_id)
        .bind(&record.program_name)
        .bind(&record.host)
        .bind(&record.description)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(record.listeners_count)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_station_on_fk(&record.station_id))?;

        row_to_live_metadata(row)
    }

    pub async fn delete(&self, station_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM live_metadata WHERE station_id = $1")
            .bind(station_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_live_metadata(row: PgRow) -> Result<LiveMetadata, StorageError> {
    Ok(LiveMetadata {
        station_id: row.try_get("station_id")?,
        program_name: row.try_get("program_name")?,
        host: row.try_get("host")?,
        description: row.try_get("description")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        listeners_count: row.try_get("listeners_count")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_none() {
        let record = LiveMetadataPayload {
            station_id: Some("lima".into()),
            program_name: Some("   ".into()),
            host: Some("Nicolás Lúcar".into()),
            start_time: Some("".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(record.program_name, None);
        assert_eq!(record.host.as_deref(), Some("Nicolás Lúcar"));
        assert_eq!(record.start_time, None);
        assert_eq!(record.listeners_count, 0);
    }

    #[test]
    fn invalid_values_are_reported_together() {
        let errors = LiveMetadataPayload {
            station_id: None,
            end_time: Some("25:00".into()),
            listeners_count: Some(-3),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "stationId is required".to_string(),
                "endTime must be a time of day as HH:MM".to_string(),
                "listenersCount must be a non-negative integer".to_string(),
            ]
        );
    }

    #[test]
    fn serializes_times_as_hours_and_minutes() {
        let live = LiveMetadata {
            station_id: "lima".into(),
            program_name: Some("Edición especial".into()),
            host: None,
            description: None,
            start_time: NaiveTime::from_hms_opt(20, 0, 0),
            end_time: None,
            listeners_count: 120,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&live).unwrap();
        assert_eq!(json["startTime"], "20:00");
        assert!(json["endTime"].is_null());
        assert_eq!(json["listenersCount"], 120);
    }
}
