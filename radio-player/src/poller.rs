use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::directory::{DirectoryError, StationDirectory};
use crate::logging::Logger;
use crate::models::{resolve_program, LiveMetadataResponse, LiveOverride, ResolvedProgram, ScheduledProgram};

/// Latest known on-air data for the selected station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataState {
    pub station_id: Option<String>,
    pub current_program: Option<ScheduledProgram>,
    pub live_metadata: Option<LiveOverride>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MetadataState {
    fn cleared(station_id: String) -> Self {
        Self {
            station_id: Some(station_id),
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn resolved_program(&self) -> Option<ResolvedProgram> {
        resolve_program(self.current_program.as_ref(), self.live_metadata.as_ref())
    }
}

enum Control {
    Select(String),
    Refetch,
}

struct Fetched {
    seq: u64,
    station_id: String,
    result: Result<LiveMetadataResponse, DirectoryError>,
}

/// Polls `/live-metadata` for whichever station is selected.
///
/// Selecting a station clears the published state and fetches at once; the
/// refresh interval restarts from that moment. Results are applied only if
/// they belong to the selected station and are newer than what is shown.
pub struct MetadataPoller {
    control: mpsc::UnboundedSender<Control>,
    state: watch::Receiver<MetadataState>,
    task: JoinHandle<()>,
}

impl MetadataPoller {
    pub fn spawn(directory: Arc<dyn StationDirectory>, interval: Duration, logger: Logger) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(MetadataState::default());
        let task = tokio::spawn(run(directory, interval, logger, control_rx, state_tx));
        Self {
            control: control_tx,
            state: state_rx,
            task,
        }
    }

    pub fn select_station(&self, station_id: impl Into<String>) {
        let _ = self.control.send(Control::Select(station_id.into()));
    }

    pub fn refetch(&self) {
        let _ = self.control.send(Control::Refetch);
    }

    pub fn subscribe(&self) -> watch::Receiver<MetadataState> {
        self.state.clone()
    }

    pub fn current(&self) -> MetadataState {
        self.state.borrow().clone()
    }
}

impl Drop for MetadataPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    directory: Arc<dyn StationDirectory>,
    period: Duration,
    logger: Logger,
    mut control: mpsc::UnboundedReceiver<Control>,
    state: watch::Sender<MetadataState>,
) {
    let (results_tx, mut results) = mpsc::unbounded_channel::<Fetched>();
    let mut selected: Option<String> = None;
    let mut ticker: Option<Interval> = None;
    let mut next_seq: u64 = 0;
    let mut applied_seq: u64 = 0;

    let fetch = |seq: u64, station_id: String| {
        let directory = Arc::clone(&directory);
        let results = results_tx.clone();
        tokio::spawn(async move {
            let result = directory.live_metadata(&station_id).await;
            let _ = results.send(Fetched {
                seq,
                station_id,
                result,
            });
        });
    };

    loop {
        tokio::select! {
            message = control.recv() => match message {
                Some(Control::Select(station_id)) => {
                    if selected.as_deref() == Some(station_id.as_str()) {
                        continue;
                    }
                    logger.debug("metadata.station_selected", json!({ "stationId": station_id }));
                    selected = Some(station_id.clone());
                    state.send_replace(MetadataState::cleared(station_id.clone()));
                    let mut fresh = interval_at(Instant::now() + period, period);
                    fresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    ticker = Some(fresh);
                    next_seq += 1;
                    fetch(next_seq, station_id);
                }
                Some(Control::Refetch) => {
                    if let Some(station_id) = selected.clone() {
                        next_seq += 1;
                        fetch(next_seq, station_id);
                    }
                }
                None => break,
            },
            _ = next_tick(&mut ticker) => {
                if let Some(station_id) = selected.clone() {
                    next_seq += 1;
                    fetch(next_seq, station_id);
                }
            }
            Some(fetched) = results.recv() => {
                if selected.as_deref() != Some(fetched.station_id.as_str()) || fetched.seq <= applied_seq {
                    logger.debug(
                        "metadata.stale_result_dropped",
                        json!({ "stationId": fetched.station_id, "seq": fetched.seq }),
                    );
                    continue;
                }
                applied_seq = fetched.seq;
                match fetched.result {
                    Ok(response) => state.send_modify(|current| {
                        current.current_program = response.current_program;
                        current.live_metadata = response.live_metadata;
                        current.is_loading = false;
                        current.error = None;
                        current.updated_at = Some(Utc::now());
                    }),
                    Err(error) => {
                        logger.warn(
                            "metadata.fetch_failed",
                            json!({ "stationId": fetched.station_id, "error": error.to_string() }),
                        );
                        // previous data stays visible until a fetch succeeds
                        state.send_modify(|current| {
                            current.is_loading = false;
                            current.error = Some(error.to_string());
                        });
                    }
                }
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
