mod models;
mod sanitize;
mod storage;

pub use models::{
    is_valid_station_id, SocialLinks, SocialLinksPayload, Station, StationPayload, StationRecord,
    MAX_STATION_ID_LENGTH,
};
pub(crate) use models::{normalize, optional, required};
pub use sanitize::{sanitize_asset_url, sanitize_stream_url};
pub(crate) use storage::missing_station_on_fk;
pub use storage::{StationStorage, StorageError};
