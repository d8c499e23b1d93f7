use sqlx::{postgres::PgRow, PgPool, Row};

use super::{on_air, NormalizedProgramFilter, Program, ProgramRecord};
use crate::schedule::{parse_time_of_day, DayType, ScheduleInstant, TimetableEntry};
use crate::stations::{missing_station_on_fk, StorageError};

const PROGRAM_COLUMNS: &str = "p.id, p.station_id, s.name AS station_name, p.name, p.host, \
     p.start_time, p.end_time, p.image, p.description, p.day_type, p.active, \
     p.created_at, p.updated_at";

#[derive(Clone)]
pub struct ProgramStorage {
    pool: PgPool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub removed: u64,
    pub inserted: u64,
}

impl ProgramStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &NormalizedProgramFilter) -> Result<Vec<Program>, StorageError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PROGRAM_COLUMNS}
            FROM programs p
            LEFT JOIN stations s ON s.id = p.station_id
            WHERE ($1::VARCHAR IS NULL OR p.station_id = $1)
              AND ($2::VARCHAR IS NULL OR p.day_type = $2)
              AND ($3::BOOLEAN IS NULL OR p.active = $3)
            ORDER BY p.start_time ASC, p.id ASC
            "#
        ))
        .bind(&filter.station_id)
        .bind(filter.day_type.map(|day| day.as_str()))
        .bind(filter.active)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_program).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Program>, StorageError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {PROGRAM_COLUMNS}
            FROM programs p
            LEFT JOIN stations s ON s.id = p.station_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_program).transpose()
    }

    pub async fn create(&self, record: &ProgramRecord) -> Result<Program, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO programs (station_id, name, host, start_time, end_time, image, description, day_type, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&record.station_id)
        .bind(&record.name)
        .bind(&record.host)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(&record.image)
        .bind(&record.description)
        .bind(record.day_type.as_str())
        .bind(record.active)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_station_on_fk(&record.station_id))?;

        let id: i64 = row.try_get("id")?;
        self.get(id).await?.ok_or_else(|| {
            StorageError::InvalidData(format!("program {id} vanished after insert"))
        })
    }

    pub async fn update(
        &self,
        id: i64,
        record: &ProgramRecord,
    ) -> Result<Option<Program>, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE programs
            SET station_id = $2,
                name = $3,
                host = $4,
                start_time = $5,
                end_time = $6,
                image = $7,
                description = $8,
                day_type = $9,
                active = $10,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&record.station_id)
        .bind(&record.name)
        .bind(&record.host)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(&record.image)
        .bind(&record.description)
        .bind(record.day_type.as_str())
        .bind(record.active)
        .execute(&self.pool)
        .await
        .map_err(missing_station_on_fk(&record.station_id))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    pub async fn update_image(&self, id: i64, image: &str) -> Result<bool, StorageError> {
        let result =
            sqlx::query("UPDATE programs SET image = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(image)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn deactivate(&self, id: i64) -> Result<bool, StorageError> {
        let result =
            sqlx::query("UPDATE programs SET active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM programs WHERE active")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    /// The program on air at `instant`. Rows of the instant's day type and
    /// of the day before are loaded; `on_air` decides between them.
    pub async fn current_program(
        &self,
        station_id: &str,
        instant: &ScheduleInstant,
    ) -> Result<Option<Program>, StorageError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PROGRAM_COLUMNS}
            FROM programs p
            LEFT JOIN stations s ON s.id = p.station_id
            WHERE p.station_id = $1
              AND p.active
              AND p.day_type IN ($2, $3)
            "#
        ))
        .bind(station_id)
        .bind(instant.day_type.as_str())
        .bind(instant.previous_day_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        let programs = rows
            .into_iter()
            .map(row_to_program)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(on_air(&programs, instant).cloned())
    }

    /// Loads timetable entries for one station in a single transaction,
    /// optionally removing the station's existing programs first.
    pub async fn import_timetable<'a>(
        &self,
        station_id: &str,
        entries: impl IntoIterator<Item = &'a TimetableEntry>,
        clear_existing: bool,
    ) -> Result<ImportOutcome, StorageError> {
        let mut tx = self.pool.begin().await?;

        let removed = if clear_existing {
            sqlx::query("DELETE FROM programs WHERE station_id = $1")
                .bind(station_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            0
        };

        let mut inserted = 0;
        for entry in entries {
            let (Some(start), Some(end)) =
                (parse_time_of_day(entry.start), parse_time_of_day(entry.end))
            else {
                return Err(StorageError::InvalidData(format!(
                    "timetable slot `{}` has an invalid window",
                    entry.name
                )));
            };
            sqlx::query(
                r#"
                INSERT INTO programs (station_id, name, host, start_time, end_time, day_type)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(station_id)
            .bind(entry.name)
            .bind(entry.host)
            .bind(start)
            .bind(end)
            .bind(entry.day_type.as_str())
            .execute(&mut *tx)
            .await
            .map_err(missing_station_on_fk(station_id))?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(ImportOutcome { removed, inserted })
    }
}

fn row_to_program(row: PgRow) -> Result<Program, StorageError> {
    let id: i64 = row.try_get("id")?;
    let day_type_raw: String = row.try_get("day_type")?;
    let day_type = day_type_raw
        .parse::<DayType>()
        .map_err(|err| StorageError::InvalidData(format!("program {id}: {err}")))?;

    Ok(Program {
        id,
        station_id: row.try_get("station_id")?,
        station_name: row.try_get("station_name")?,
        name: row.try_get("name")?,
        host: row.try_get("host")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        image: row.try_get("image")?,
        description: row.try_get("description")?,
        day_type,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
