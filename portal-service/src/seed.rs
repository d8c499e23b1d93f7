use serde_json::json;
use sqlx::PgPool;

use crate::logging::logger;
use crate::programs::{ImportOutcome, ProgramStorage};
use crate::schedule::weekly_timetable;
use crate::stations::{StationStorage, StorageError};

struct SeedStation {
    id: &'static str,
    city: &'static str,
    port: u16,
    description: &'static str,
}

const STREAM_HOST: &str = "aacplus.rstreaming.net";

const DEFAULT_STATIONS: &[SeedStation] = &[
    SeedStation { id: "lima", city: "Lima", port: 7190, description: "La radio más escuchada del Perú" },
    SeedStation { id: "arequipa", city: "Arequipa", port: 7790, description: "Exitosa en la Ciudad Blanca" },
    SeedStation { id: "chiclayo", city: "Chiclayo", port: 7490, description: "Exitosa en la Capital de la Amistad" },
    SeedStation { id: "trujillo", city: "Trujillo", port: 7590, description: "Exitosa en la Ciudad de la Eterna Primavera" },
    SeedStation { id: "piura", city: "Piura", port: 7890, description: "Exitosa en la Ciudad del Eterno Sol" },
    SeedStation { id: "cusco", city: "Cusco", port: 7990, description: "Exitosa en la Capital Imperial" },
    SeedStation { id: "huancayo", city: "Huancayo", port: 8090, description: "Exitosa en la Ciudad Incontrastable" },
    SeedStation { id: "huacho", city: "Huacho", port: 8190, description: "Exitosa en Huacho" },
    SeedStation { id: "ica", city: "Ica", port: 8290, description: "Exitosa en la Ciudad del Eterno Sol" },
    SeedStation { id: "iquitos", city: "Iquitos", port: 8390, description: "Exitosa en la Capital de la Amazonía Peruana" },
    SeedStation { id: "tacna", city: "Tacna", port: 8490, description: "Exitosa en la Ciudad Heroica" },
    SeedStation { id: "tarapoto", city: "Tarapoto", port: 8590, description: "Exitosa en la Ciudad de las Palmeras" },
];

/// `(station, facebook, youtube, tiktok)`
const DEFAULT_SOCIAL_LINKS: &[(&str, &str, &str, &str)] = &[
    (
        "lima",
        "https://www.facebook.com/Exitosanoticias",
        "https://www.youtube.com/@exitosape",
        "https://www.tiktok.com/@exitosanoticias",
    ),
    (
        "arequipa",
        "https://www.facebook.com/ExitosaArequipaOficial",
        "https://www.youtube.com/@exitosaarequipa",
        "https://www.tiktok.com/@exitosaarequipa",
    ),
    (
        "chiclayo",
        "https://www.facebook.com/exitosachiclayofm",
        "https://www.youtube.com/@exitosachiclayo",
        "https://www.tiktok.com/@exitosachiclayo",
    ),
    (
        "trujillo",
        "https://www.facebook.com/ExitosaTrujillo",
        "https://www.youtube.com/@exitosatrujillo",
        "https://www.tiktok.com/@exitosa.trujillo",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { stations: usize, social_links: usize },
    AlreadyPopulated { stations: i64 },
}

/// Inserts the default station list and its social links when the stations
/// table is empty. Runs in one transaction.
pub async fn seed_defaults(pool: &PgPool) -> Result<SeedOutcome, StorageError> {
    let existing = StationStorage::new(pool.clone()).count_all().await?;
    if existing > 0 {
        return Ok(SeedOutcome::AlreadyPopulated { stations: existing });
    }

    let mut tx = pool.begin().await?;
    for station in DEFAULT_STATIONS {
        sqlx::query(
            r#"
            INSERT INTO stations (id, name, url, image, description, region, city)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(station.id)
        .bind(format!("Exitosa {}", station.city))
        .bind(format!("https://{STREAM_HOST}:{}/stream", station.port))
        .bind(format!("/radios/exitosa-{}.png", station.id))
        .bind(station.description)
        .bind(station.id)
        .bind(station.city)
        .execute(&mut *tx)
        .await?;
    }
    for (station_id, facebook, youtube, tiktok) in DEFAULT_SOCIAL_LINKS {
        sqlx::query(
            r#"
            INSERT INTO social_links (station_id, facebook, youtube, tiktok)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (station_id) DO NOTHING
            "#,
        )
        .bind(*station_id)
        .bind(*facebook)
        .bind(*youtube)
        .bind(*tiktok)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(SeedOutcome::Seeded {
        stations: DEFAULT_STATIONS.len(),
        social_links: DEFAULT_SOCIAL_LINKS.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    Station(String),
    AllActive,
}

/// Loads the built-in weekly timetable into the targeted stations. Each
/// station is imported in its own transaction.
pub async fn import_timetable(
    stations: &StationStorage,
    programs: &ProgramStorage,
    target: &ImportTarget,
    clear_existing: bool,
) -> Result<Vec<(String, ImportOutcome)>, StorageError> {
    let station_ids = match target {
        ImportTarget::Station(id) => {
            if stations.get(id).await?.is_none() {
                return Err(StorageError::MissingStation(id.clone()));
            }
            vec![id.clone()]
        }
        ImportTarget::AllActive => stations.active_ids().await?,
    };

    let mut outcomes = Vec::with_capacity(station_ids.len());
    for station_id in station_ids {
        let outcome = programs
            .import_timetable(&station_id, weekly_timetable(), clear_existing)
            .await?;
        logger().info(
            "schedule.imported",
            json!({
                "stationId": station_id,
                "removed": outcome.removed,
                "inserted": outcome.inserted,
            }),
        );
        outcomes.push((station_id, outcome));
    }
    Ok(outcomes)
}
