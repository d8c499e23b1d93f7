use std::env;

use anyhow::Context;
use serde_json::json;

use portal_service::{
    config::Config,
    database::Database,
    http,
    logging::{init_logger, logger},
    migrations::run_migrations,
    seed::{import_timetable, seed_defaults, ImportTarget, SeedOutcome},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = init_logger("portal-service");

    let config = Config::load().context("failed to load configuration")?;
    let command = env::args().nth(1);

    if matches!(command.as_deref(), Some("check-config")) {
        logger.info(
            "config.check_passed",
            serde_json::to_value(&config).unwrap_or_else(|_| json!({ "status": "ok" })),
        );
        return Ok(());
    }

    let database = Database::connect(&config.postgres)
        .await
        .context("failed to connect to postgres")?;
    run_migrations(&database).await?;

    let state = AppState::new(config.clone(), database.clone());
    let result = match command.as_deref() {
        Some("seed") => seed(&state).await,
        Some("import-schedule") => import_schedule(&state, env::args().skip(2).collect()).await,
        Some(other) => Err(anyhow::anyhow!(
            "unknown command `{other}` (expected check-config, seed or import-schedule)"
        )),
        None => {
            logger.info(
                "server.initialized",
                json!({
                    "port": config.port,
                    "scheduleUtcOffsetMinutes": config.schedule.utc_offset_minutes,
                }),
            );
            http::serve(state).await.context("http server failed")
        }
    };

    database.close().await;
    logger.info("server.stopped", json!({}));
    result
}

async fn seed(state: &AppState) -> anyhow::Result<()> {
    let outcome = seed_defaults(state.database.pool())
        .await
        .context("failed to seed default stations")?;
    match outcome {
        SeedOutcome::Seeded {
            stations,
            social_links,
        } => logger().info(
            "seed.completed",
            json!({ "stations": stations, "socialLinks": social_links }),
        ),
        SeedOutcome::AlreadyPopulated { stations } => {
            logger().info("seed.skipped", json!({ "existingStations": stations }))
        }
    }
    Ok(())
}

/// `import-schedule <stationId> [--clear]` or `import-schedule --all [--clear]`
async fn import_schedule(state: &AppState, args: Vec<String>) -> anyhow::Result<()> {
    let clear = args.iter().any(|arg| arg == "--clear");
    let all = args.iter().any(|arg| arg == "--all");
    let station = args.iter().find(|arg| !arg.starts_with("--")).cloned();

    let target = match (station, all) {
        (Some(id), false) => ImportTarget::Station(id),
        (None, true) => ImportTarget::AllActive,
        _ => anyhow::bail!("usage: import-schedule <stationId>|--all [--clear]"),
    };

    let outcomes = import_timetable(&state.stations, &state.programs, &target, clear)
        .await
        .context("failed to import timetable")?;
    logger().info(
        "schedule.import_completed",
        json!({
            "stations": outcomes.len(),
            "inserted": outcomes.iter().map(|(_, o)| o.inserted).sum::<u64>(),
        }),
    );
    Ok(())
}
