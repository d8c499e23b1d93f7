use std::sync::Arc;

use chrono::Local;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use url::Url;

use crate::config::PlayerConfig;
use crate::directory::StationDirectory;
use crate::logging::Logger;
use crate::machine::{Command, Coordinator, Input, PlayerSnapshot};
use crate::media::{MediaElement, MediaEvent, Seq};
use crate::now_playing::{NowPlayingIntegration, TransportCommand};
use crate::poller::MetadataPoller;
use crate::tv::TvPanel;

/// Control surface for a running player. Dropping every handle stops the
/// player task.
#[derive(Clone)]
pub struct PlayerHandle {
    inputs: mpsc::UnboundedSender<Input>,
    snapshot: watch::Receiver<PlayerSnapshot>,
    tv_embed_url: Option<Url>,
    task: Arc<JoinHandle<()>>,
}

impl PlayerHandle {
    pub fn toggle_play(&self) {
        self.send(Input::TogglePlay);
    }

    pub fn next_station(&self) {
        self.send(Input::NextStation);
    }

    pub fn prev_station(&self) {
        self.send(Input::PreviousStation);
    }

    pub fn change_station(&self, index: usize) {
        self.send(Input::ChangeStation(index));
    }

    /// Entry point for media keys and lock-screen controls.
    pub fn transport(&self, command: TransportCommand) {
        self.send(Input::Transport(command));
    }

    pub fn refetch_metadata(&self) {
        self.send(Input::RefetchMetadata);
    }

    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A fresh video panel for the configured embed. The panel lives beside
    /// the audio player and never sends it inputs.
    pub fn tv_panel(&self) -> TvPanel {
        TvPanel::new(self.tv_embed_url.clone())
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    fn send(&self, input: Input) {
        let _ = self.inputs.send(input);
    }
}

/// Starts the player task. The media element is owned by that task from
/// here on; nothing else may drive it.
pub fn spawn(
    config: PlayerConfig,
    directory: Arc<dyn StationDirectory>,
    mut media: Box<dyn MediaElement>,
    now_playing: Option<Box<dyn NowPlayingIntegration>>,
) -> PlayerHandle {
    let logger = Logger::new("radio-player");
    let coordinator = Coordinator::new(config.default_station_id.clone(), config.brand.clone());
    let (snapshot_tx, snapshot_rx) = watch::channel(coordinator.snapshot());
    let (inputs_tx, inputs_rx) = mpsc::unbounded_channel();
    let (media_tx, media_rx) = mpsc::unbounded_channel();
    media.attach(media_tx);

    let poller = MetadataPoller::spawn(
        Arc::clone(&directory),
        config.metadata_interval,
        logger.named("metadata-poller"),
    );

    let tv_embed_url = config.tv_embed_url.clone();
    let runtime = Runtime {
        config,
        coordinator,
        media,
        now_playing,
        poller,
        logger,
        load_deadline: None,
        autoplay_deadline: None,
        snapshot: snapshot_tx,
    };
    let task = tokio::spawn(runtime.run(directory, inputs_rx, media_rx));

    PlayerHandle {
        inputs: inputs_tx,
        snapshot: snapshot_rx,
        tv_embed_url,
        task: Arc::new(task),
    }
}

struct Runtime {
    config: PlayerConfig,
    coordinator: Coordinator,
    media: Box<dyn MediaElement>,
    now_playing: Option<Box<dyn NowPlayingIntegration>>,
    poller: MetadataPoller,
    logger: Logger,
    load_deadline: Option<(Instant, Seq)>,
    autoplay_deadline: Option<(Instant, Seq)>,
    snapshot: watch::Sender<PlayerSnapshot>,
}

impl Runtime {
    async fn run(
        mut self,
        directory: Arc<dyn StationDirectory>,
        mut inputs: mpsc::UnboundedReceiver<Input>,
        mut media_events: mpsc::UnboundedReceiver<MediaEvent>,
    ) {
        let mut metadata = self.poller.subscribe();
        let mut ticker = interval(self.config.progress_tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let stations = directory.active_stations();
        tokio::pin!(stations);
        let mut loading_stations = true;

        self.logger.info(
            "player.started",
            json!({
                "defaultStation": self.config.default_station_id,
                "loadTimeoutMs": self.config.load_timeout.as_millis() as u64,
            }),
        );

        loop {
            let input = tokio::select! {
                result = &mut stations, if loading_stations => {
                    loading_stations = false;
                    match result {
                        Ok(list) => {
                            self.logger.info("player.stations_loaded", json!({ "count": list.len() }));
                            Input::StationsLoaded(list)
                        }
                        Err(error) => {
                            self.logger.error(
                                "player.stations_failed",
                                json!({ "error": error.to_string() }),
                            );
                            continue;
                        }
                    }
                }
                input = inputs.recv() => match input {
                    Some(input) => input,
                    None => break,
                },
                Some(event) = media_events.recv() => Input::Media(event),
                Ok(()) = metadata.changed() => Input::Metadata(metadata.borrow_and_update().clone()),
                seq = wait_for(self.load_deadline) => {
                    self.load_deadline = None;
                    Input::LoadTimedOut { seq }
                }
                token = wait_for(self.autoplay_deadline) => {
                    self.autoplay_deadline = None;
                    Input::AutoPlayDue { token }
                }
                _ = ticker.tick() => Input::Tick(Local::now().naive_local()),
            };
            self.apply(input);
        }

        self.media.pause();
        self.logger.info("player.stopped", json!({}));
    }

    fn apply(&mut self, input: Input) {
        for command in self.coordinator.handle(input) {
            self.execute(command);
        }
        let next = self.coordinator.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Pause => {
                self.media.pause();
                self.media.seek_to_live_edge();
            }
            Command::Load { seq, url } => {
                self.logger.info(
                    "player.source_assigned",
                    json!({
                        "seq": seq,
                        "stationId": self.coordinator.current_station().map(|s| s.id.as_str()),
                    }),
                );
                self.media.load(seq, &url);
            }
            Command::Play { seq } => self.media.play(seq),
            Command::ArmLoadTimeout { seq } => {
                self.load_deadline = Some((Instant::now() + self.config.load_timeout, seq));
            }
            Command::ArmAutoPlay { token } => {
                self.autoplay_deadline = Some((Instant::now() + self.config.autoplay_delay, token));
            }
            Command::SelectStation(station_id) => self.poller.select_station(station_id),
            Command::RefetchMetadata => self.poller.refetch(),
            Command::PublishMetadata(metadata) => {
                if let Some(integration) = self.now_playing.as_mut() {
                    integration.publish_metadata(&metadata);
                }
            }
            Command::PublishPlaybackState(state) => {
                if let Some(integration) = self.now_playing.as_mut() {
                    integration.publish_playback_state(state);
                }
            }
            Command::ReportFailure(failure) => {
                self.logger.warn(
                    "player.playback_failed",
                    json!({
                        "failure": failure,
                        "stationId": self.coordinator.current_station().map(|s| s.id.as_str()),
                    }),
                );
            }
        }
    }
}

async fn wait_for(deadline: Option<(Instant, Seq)>) -> Seq {
    match deadline {
        Some((at, seq)) => {
            sleep_until(at).await;
            seq
        }
        None => std::future::pending().await,
    }
}
