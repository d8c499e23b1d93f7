use crate::{
    config::Config,
    database::Database,
    live_metadata::LiveMetadataStorage,
    programs::ProgramStorage,
    schedule::ScheduleClock,
    stations::StationStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub database: Database,
    pub stations: StationStorage,
    pub programs: ProgramStorage,
    pub live_metadata: LiveMetadataStorage,
    pub clock: ScheduleClock,
}

impl AppState {
    /// Wires the stores over an already constructed pool. The caller keeps
    /// ownership of shutdown through `database.close()`.
    pub fn new(config: Config, database: Database) -> Self {
        let pool = database.pool().clone();
        let clock = ScheduleClock::new(config.schedule.offset());
        Self {
            stations: StationStorage::new(pool.clone()),
            programs: ProgramStorage::new(pool.clone()),
            live_metadata: LiveMetadataStorage::new(pool),
            clock,
            config,
            database,
        }
    }

    pub async fn ping_postgres(&self) -> Result<(), sqlx::Error> {
        self.database.ping().await
    }
}
