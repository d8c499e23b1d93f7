//! Client-side playback for the station network: station directory client,
//! live metadata polling, the playback coordinator and its host seams.

pub mod config;
pub mod directory;
pub mod logging;
pub mod machine;
pub mod media;
pub mod models;
pub mod now_playing;
pub mod player;
pub mod poller;
pub mod progress;
pub mod tv;

pub use config::PlayerConfig;
pub use directory::{DirectoryError, HttpStationDirectory, StationDirectory};
pub use machine::{PlaybackFailure, PlayerSnapshot};
pub use media::{MediaElement, MediaEvent, Seq};
pub use now_playing::{NowPlayingIntegration, NowPlayingMetadata, PlaybackState, TransportCommand};
pub use player::{spawn, PlayerHandle};
pub use poller::{MetadataPoller, MetadataState};
pub use progress::program_progress;
pub use tv::TvPanel;
