#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveTime;
use radio_player::directory::{DirectoryError, StationDirectory};
use radio_player::models::{LiveMetadataResponse, ScheduledProgram, Station};
use radio_player::{MediaElement, MediaEvent, NowPlayingIntegration, NowPlayingMetadata, PlaybackState, Seq};
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

pub fn station(id: &str, city: &str) -> Station {
    Station {
        id: id.into(),
        name: format!("Exitosa {city}"),
        url: format!("https://streams.example.com/{id}"),
        image: Some(format!("/radios/exitosa-{id}.png")),
        description: None,
        region: id.into(),
        city: city.into(),
    }
}

pub fn four_stations() -> Vec<Station> {
    vec![
        station("lima", "Lima"),
        station("arequipa", "Arequipa"),
        station("trujillo", "Trujillo"),
        station("chiclayo", "Chiclayo"),
    ]
}

pub fn on_air(station_id: &str, program: &str) -> LiveMetadataResponse {
    LiveMetadataResponse {
        station_id: Some(station_id.into()),
        current_program: Some(ScheduledProgram {
            id: Some(1),
            name: program.into(),
            host: Some("Conducción".into()),
            start_time: NaiveTime::from_hms_opt(6, 0, 0),
            end_time: NaiveTime::from_hms_opt(10, 0, 0),
            image: None,
            description: None,
        }),
        live_metadata: None,
        current_time: Some("08:00".into()),
        day_type: Some("weekday".into()),
    }
}

/// In-memory directory. Live metadata answers can be delayed or failed per
/// station.
#[derive(Default)]
pub struct FakeDirectory {
    pub stations: Vec<Station>,
    pub metadata: Mutex<HashMap<String, LiveMetadataResponse>>,
    pub delays: HashMap<String, Duration>,
    pub failing: Mutex<HashSet<String>>,
    pub metadata_calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            ..Self::default()
        }
    }

    pub fn with_metadata(self, station_id: &str, program: &str) -> Self {
        self.metadata
            .lock()
            .unwrap()
            .insert(station_id.into(), on_air(station_id, program));
        self
    }

    pub fn with_delay(mut self, station_id: &str, delay: Duration) -> Self {
        self.delays.insert(station_id.into(), delay);
        self
    }

    pub fn set_failing(&self, station_id: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(station_id.into());
        } else {
            set.remove(station_id);
        }
    }

    pub fn calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StationDirectory for FakeDirectory {
    async fn active_stations(&self) -> Result<Vec<Station>, DirectoryError> {
        Ok(self.stations.clone())
    }

    async fn live_metadata(&self, station_id: &str) -> Result<LiveMetadataResponse, DirectoryError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(station_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.lock().unwrap().contains(station_id) {
            return Err(DirectoryError::Status {
                endpoint: "live-metadata",
                status: StatusCode::BAD_GATEWAY,
            });
        }
        Ok(self
            .metadata
            .lock()
            .unwrap()
            .get(station_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Load(Seq, String),
    Play(Seq),
    Pause,
    SeekToLiveEdge,
}

/// Media element that becomes ready and accepts play requests right away,
/// except for URLs listed in `stalled_urls`, which never finish loading.
#[derive(Clone, Default)]
pub struct FakeMedia {
    pub calls: Arc<Mutex<Vec<MediaCall>>>,
    pub stalled_urls: Arc<Mutex<HashSet<String>>>,
    events: Arc<Mutex<Option<UnboundedSender<MediaEvent>>>>,
    current_url: Arc<Mutex<Option<String>>>,
}

impl FakeMedia {
    pub fn stall(&self, url: &str) {
        self.stalled_urls.lock().unwrap().insert(url.into());
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn play_requests(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MediaCall::Play(_)))
            .count()
    }

    pub fn loaded_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MediaCall::Load(_, url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Simulates the element starting on its own.
    pub fn emit(&self, event: MediaEvent) {
        if let Some(events) = self.events.lock().unwrap().as_ref() {
            let _ = events.send(event);
        }
    }

    fn stalled(&self) -> bool {
        let current = self.current_url.lock().unwrap();
        current
            .as_ref()
            .map(|url| self.stalled_urls.lock().unwrap().contains(url))
            .unwrap_or(false)
    }
}

impl MediaElement for FakeMedia {
    fn attach(&mut self, events: UnboundedSender<MediaEvent>) {
        *self.events.lock().unwrap() = Some(events);
    }

    fn load(&mut self, seq: Seq, url: &str) {
        self.calls.lock().unwrap().push(MediaCall::Load(seq, url.into()));
        *self.current_url.lock().unwrap() = Some(url.into());
        self.emit(MediaEvent::LoadStart { seq });
        if !self.stalled() {
            self.emit(MediaEvent::CanPlay { seq });
        }
    }

    fn play(&mut self, seq: Seq) {
        self.calls.lock().unwrap().push(MediaCall::Play(seq));
        if !self.stalled() {
            self.emit(MediaEvent::PlayResolved { seq });
            self.emit(MediaEvent::Playing);
        }
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(MediaCall::Pause);
    }

    fn seek_to_live_edge(&mut self) {
        self.calls.lock().unwrap().push(MediaCall::SeekToLiveEdge);
    }
}

#[derive(Clone, Default)]
pub struct RecordingNowPlaying {
    pub metadata: Arc<Mutex<Vec<NowPlayingMetadata>>>,
    pub states: Arc<Mutex<Vec<PlaybackState>>>,
}

impl NowPlayingIntegration for RecordingNowPlaying {
    fn publish_metadata(&mut self, metadata: &NowPlayingMetadata) {
        self.metadata.lock().unwrap().push(metadata.clone());
    }

    fn publish_playback_state(&mut self, state: PlaybackState) {
        self.states.lock().unwrap().push(state);
    }
}
