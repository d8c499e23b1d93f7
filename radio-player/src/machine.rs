//! Playback coordination as a plain state machine.
//!
//! `Coordinator::handle` takes one [`Input`] and returns the [`Command`]s the
//! runtime must carry out against the media element, the timers and the
//! metadata poller. Nothing in here performs I/O, which keeps every
//! transition testable without a runtime.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::media::{MediaEvent, Seq};
use crate::models::{LiveOverride, ProgramInfo, ResolvedProgram, ScheduledProgram, Station};
use crate::now_playing::{compose_metadata, NowPlayingMetadata, PlaybackState, TransportCommand};
use crate::poller::MetadataState;
use crate::progress::program_progress;

pub const INITIAL_TITLE: &str = "Press play";
pub const SWITCHING_TITLE: &str = "Switching station...";
pub const FAILED_TITLE: &str = "Failed to load";
pub const LIVE_TITLE: &str = "Live";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A new source is loading; `resume` says whether to play once it is ready.
    Switching { target: usize, seq: Seq, resume: bool },
    /// A play request is outstanding.
    Buffering { seq: Seq },
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    StationsLoaded(Vec<Station>),
    ChangeStation(usize),
    NextStation,
    PreviousStation,
    TogglePlay,
    Transport(TransportCommand),
    RefetchMetadata,
    AutoPlayDue { token: Seq },
    LoadTimedOut { seq: Seq },
    Media(MediaEvent),
    Metadata(MetadataState),
    Tick(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pause and rewind to the live edge.
    Pause,
    Load { seq: Seq, url: String },
    Play { seq: Seq },
    ArmLoadTimeout { seq: Seq },
    ArmAutoPlay { token: Seq },
    SelectStation(String),
    RefetchMetadata,
    PublishMetadata(NowPlayingMetadata),
    PublishPlaybackState(PlaybackState),
    ReportFailure(PlaybackFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackFailure {
    LoadTimeout,
    LoadError,
    PlayRejected,
}

/// Read model published to presentation layers after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub stations: Vec<Station>,
    pub current_station_index: usize,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub user_paused: bool,
    pub is_changing_station: bool,
    pub has_auto_played: bool,
    pub stations_loaded: bool,
    pub program_info: ProgramInfo,
    pub program_progress: f64,
    pub current_program: Option<ScheduledProgram>,
    pub live_metadata: Option<LiveOverride>,
    pub metadata_error: Option<String>,
    pub failure: Option<PlaybackFailure>,
}

impl PlayerSnapshot {
    pub fn current_station(&self) -> Option<&Station> {
        self.stations.get(self.current_station_index)
    }
}

pub struct Coordinator {
    default_station_id: String,
    brand: String,
    stations: Vec<Station>,
    current: usize,
    default_index: Option<usize>,
    loaded_index: Option<usize>,
    phase: Phase,
    next_seq: Seq,
    source_seq: Option<Seq>,
    autoplay_token: Option<Seq>,
    user_paused: bool,
    has_auto_played: bool,
    stations_loaded: bool,
    stalled: bool,
    failure: Option<PlaybackFailure>,
    metadata: MetadataState,
    progress: f64,
    published_metadata: Option<NowPlayingMetadata>,
    published_state: Option<PlaybackState>,
}

impl Coordinator {
    pub fn new(default_station_id: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            default_station_id: default_station_id.into(),
            brand: brand.into(),
            stations: Vec::new(),
            current: 0,
            default_index: None,
            loaded_index: None,
            phase: Phase::Idle,
            next_seq: 0,
            source_seq: None,
            autoplay_token: None,
            user_paused: false,
            has_auto_played: false,
            stations_loaded: false,
            stalled: false,
            failure: None,
            metadata: MetadataState::default(),
            progress: 0.0,
            published_metadata: None,
            published_state: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.stations.get(self.current)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Buffering { .. } | Phase::Playing)
    }

    pub fn is_buffering(&self) -> bool {
        match self.phase {
            Phase::Switching { .. } | Phase::Buffering { .. } => true,
            Phase::Playing => self.stalled,
            Phase::Idle => false,
        }
    }

    pub fn handle(&mut self, input: Input) -> Vec<Command> {
        let mut commands = Vec::new();
        match input {
            Input::StationsLoaded(stations) => self.load_stations(stations, &mut commands),
            Input::ChangeStation(index) => self.change_station(index, &mut commands),
            Input::NextStation => {
                if let Some(index) = self.neighbour(1) {
                    self.change_station(index, &mut commands);
                }
            }
            Input::PreviousStation => {
                if let Some(index) = self.neighbour(-1) {
                    self.change_station(index, &mut commands);
                }
            }
            Input::TogglePlay => self.toggle_play(&mut commands),
            Input::Transport(command) => self.transport(command, &mut commands),
            Input::RefetchMetadata => {
                if self.current_station().is_some() {
                    commands.push(Command::RefetchMetadata);
                }
            }
            Input::AutoPlayDue { token } => self.auto_play_due(token, &mut commands),
            Input::LoadTimedOut { seq } => {
                if self.awaiting(seq) {
                    self.fail(PlaybackFailure::LoadTimeout, &mut commands);
                }
            }
            Input::Media(event) => self.media_event(event, &mut commands),
            Input::Metadata(state) => {
                let current_id = self.current_station().map(|s| s.id.as_str());
                if state.station_id.as_deref() == current_id {
                    self.metadata = state;
                }
            }
            Input::Tick(now) => {
                self.progress = match (&self.phase, &self.metadata.current_program) {
                    (Phase::Playing, Some(program)) => match (program.start_time, program.end_time) {
                        (Some(start), Some(end)) => program_progress(now, start, end),
                        _ => 0.0,
                    },
                    _ => 0.0,
                };
            }
        }
        self.sync_now_playing(&mut commands);
        commands
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            stations: self.stations.clone(),
            current_station_index: self.current,
            is_playing: self.is_playing(),
            is_buffering: self.is_buffering(),
            user_paused: self.user_paused,
            is_changing_station: matches!(self.phase, Phase::Switching { .. }),
            has_auto_played: self.has_auto_played,
            stations_loaded: self.stations_loaded,
            program_info: self.program_info(),
            program_progress: self.progress,
            current_program: self.metadata.current_program.clone(),
            live_metadata: self.metadata.live_metadata.clone(),
            metadata_error: self.metadata.error.clone(),
            failure: self.failure,
        }
    }

    pub fn program_info(&self) -> ProgramInfo {
        let Some(station) = self.current_station() else {
            return ProgramInfo::new(INITIAL_TITLE, "");
        };
        let location = format!("{} {}", self.brand, station.city);

        if matches!(self.phase, Phase::Switching { .. }) {
            return ProgramInfo::new(SWITCHING_TITLE, location);
        }
        if self.failure.is_some() {
            return ProgramInfo::new(FAILED_TITLE, location);
        }
        if self.is_playing() {
            return match self.resolved_program() {
                Some(program) => ProgramInfo {
                    title: program.name,
                    subtitle: program
                        .host
                        .unwrap_or_else(|| format!("Radio {}", self.brand)),
                    image: program.image,
                },
                None => ProgramInfo::new(LIVE_TITLE, location),
            };
        }
        ProgramInfo {
            title: station.name.clone(),
            subtitle: location,
            image: station.image.clone(),
        }
    }

    fn resolved_program(&self) -> Option<ResolvedProgram> {
        self.metadata.resolved_program()
    }

    fn bump(&mut self) -> Seq {
        self.next_seq += 1;
        self.next_seq
    }

    fn awaiting(&self, seq: Seq) -> bool {
        match self.phase {
            Phase::Switching { seq: pending, .. } | Phase::Buffering { seq: pending } => {
                pending == seq
            }
            _ => false,
        }
    }

    fn neighbour(&self, offset: isize) -> Option<usize> {
        let count = self.stations.len() as isize;
        if count == 0 {
            return None;
        }
        Some((self.current as isize + offset).rem_euclid(count) as usize)
    }

    fn load_stations(&mut self, stations: Vec<Station>, commands: &mut Vec<Command>) {
        if self.stations_loaded {
            return;
        }
        self.stations_loaded = true;
        self.default_index = stations
            .iter()
            .position(|station| station.id == self.default_station_id)
            .or(if stations.is_empty() { None } else { Some(0) });
        self.stations = stations;

        if let Some(index) = self.default_index {
            self.current = index;
            commands.push(Command::SelectStation(self.stations[index].id.clone()));
        }
        self.arm_auto_play(commands);
    }

    fn auto_play_allowed(&self) -> bool {
        !self.has_auto_played
            && self.stations_loaded
            && !self.user_paused
            && self.phase == Phase::Idle
            && self.default_index == Some(self.current)
    }

    fn arm_auto_play(&mut self, commands: &mut Vec<Command>) {
        if self.autoplay_token.is_some() || !self.auto_play_allowed() {
            return;
        }
        let token = self.bump();
        self.autoplay_token = Some(token);
        commands.push(Command::ArmAutoPlay { token });
    }

    fn auto_play_due(&mut self, token: Seq, commands: &mut Vec<Command>) {
        if self.autoplay_token != Some(token) {
            return;
        }
        self.autoplay_token = None;
        if self.auto_play_allowed() {
            // the gate closes on the attempt, whatever its outcome
            self.has_auto_played = true;
            self.start_playback(commands);
        }
    }

    fn change_station(&mut self, index: usize, commands: &mut Vec<Command>) {
        if index == self.current || matches!(self.phase, Phase::Switching { .. }) {
            return;
        }
        let Some(url) = self.stations.get(index).map(|s| s.url.clone()) else {
            return;
        };
        let resume = self.is_playing();

        self.autoplay_token = None;
        self.current = index;
        self.user_paused = false;
        self.stalled = false;
        self.failure = None;
        self.metadata = MetadataState::default();
        self.progress = 0.0;

        commands.push(Command::Pause);
        let seq = self.bump();
        self.source_seq = Some(seq);
        self.loaded_index = Some(index);
        self.phase = Phase::Switching {
            target: index,
            seq,
            resume,
        };
        commands.push(Command::Load { seq, url });
        commands.push(Command::ArmLoadTimeout { seq });
        commands.push(Command::SelectStation(self.stations[index].id.clone()));
    }

    fn toggle_play(&mut self, commands: &mut Vec<Command>) {
        if self.stations.is_empty() {
            return;
        }
        self.autoplay_token = None;
        match self.phase {
            Phase::Playing | Phase::Buffering { .. } => {
                self.phase = Phase::Idle;
                self.user_paused = true;
                self.stalled = false;
                commands.push(Command::Pause);
            }
            Phase::Idle => self.start_playback(commands),
            Phase::Switching {
                target,
                seq,
                resume,
            } => {
                self.phase = Phase::Switching {
                    target,
                    seq,
                    resume: !resume,
                };
                self.user_paused = resume;
            }
        }
    }

    fn transport(&mut self, command: TransportCommand, commands: &mut Vec<Command>) {
        let wants_playback = match command {
            TransportCommand::Play => true,
            TransportCommand::Pause | TransportCommand::Stop => false,
            TransportCommand::PreviousTrack => {
                if let Some(index) = self.neighbour(-1) {
                    self.change_station(index, commands);
                }
                return;
            }
            TransportCommand::NextTrack => {
                if let Some(index) = self.neighbour(1) {
                    self.change_station(index, commands);
                }
                return;
            }
        };
        let intends_playback = match self.phase {
            Phase::Switching { resume, .. } => resume,
            _ => self.is_playing(),
        };
        if wants_playback != intends_playback {
            self.toggle_play(commands);
        }
    }

    fn start_playback(&mut self, commands: &mut Vec<Command>) {
        let Some(url) = self.current_station().map(|s| s.url.clone()) else {
            return;
        };
        self.failure = None;
        self.user_paused = false;
        self.stalled = false;

        let needs_source = self.loaded_index != Some(self.current);
        if needs_source {
            let seq = self.bump();
            self.source_seq = Some(seq);
            self.loaded_index = Some(self.current);
            commands.push(Command::Load { seq, url });
        }
        let seq = self.bump();
        self.phase = Phase::Buffering { seq };
        commands.push(Command::Play { seq });
        if needs_source {
            commands.push(Command::ArmLoadTimeout { seq });
        }
    }

    fn fail(&mut self, failure: PlaybackFailure, commands: &mut Vec<Command>) {
        self.phase = Phase::Idle;
        self.stalled = false;
        self.failure = Some(failure);
        // a failed source is reloaded by the next play
        self.loaded_index = None;
        commands.push(Command::Pause);
        commands.push(Command::ReportFailure(failure));
    }

    fn media_event(&mut self, event: MediaEvent, commands: &mut Vec<Command>) {
        match event {
            MediaEvent::LoadStart { .. } => {}
            MediaEvent::Waiting => {
                if self.phase == Phase::Playing {
                    self.stalled = true;
                }
            }
            MediaEvent::Playing => self.stalled = false,
            MediaEvent::CanPlay { seq } => match self.phase {
                Phase::Switching {
                    seq: pending,
                    resume,
                    ..
                } if pending == seq => {
                    if resume {
                        self.start_playback(commands);
                    } else {
                        self.phase = Phase::Idle;
                        self.arm_auto_play(commands);
                    }
                }
                Phase::Playing => self.stalled = false,
                _ => {}
            },
            MediaEvent::Error { seq } => {
                if self.source_seq != Some(seq) {
                    return;
                }
                match self.phase {
                    Phase::Idle => self.loaded_index = None,
                    _ => self.fail(PlaybackFailure::LoadError, commands),
                }
            }
            MediaEvent::PlayResolved { seq } => match self.phase {
                Phase::Buffering { seq: pending } if pending == seq => {
                    self.phase = Phase::Playing;
                    self.stalled = false;
                    commands.push(Command::RefetchMetadata);
                }
                // a superseded request still started the element
                Phase::Idle => commands.push(Command::Pause),
                _ => {}
            },
            MediaEvent::PlayRejected { seq } => {
                if matches!(self.phase, Phase::Buffering { seq: pending } if pending == seq) {
                    self.fail(PlaybackFailure::PlayRejected, commands);
                }
            }
            MediaEvent::Play => {
                let switching = matches!(self.phase, Phase::Switching { .. });
                if !switching && (!self.is_playing() || self.user_paused) {
                    commands.push(Command::Pause);
                }
            }
        }
    }

    fn sync_now_playing(&mut self, commands: &mut Vec<Command>) {
        let state = if self.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        if self.published_state != Some(state) {
            self.published_state = Some(state);
            commands.push(Command::PublishPlaybackState(state));
        }

        if self.phase != Phase::Playing {
            self.published_metadata = None;
            return;
        }
        let Some(station) = self.current_station() else {
            return;
        };
        let program = self.resolved_program();
        let metadata = compose_metadata(station, program.as_ref(), true, &self.brand);
        if self.published_metadata.as_ref() != Some(&metadata) {
            self.published_metadata = Some(metadata.clone());
            commands.push(Command::PublishMetadata(metadata));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn station(id: &str, city: &str) -> Station {
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

    fn four_stations() -> Vec<Station> {
        vec![
            station("lima", "Lima"),
            station("arequipa", "Arequipa"),
            station("trujillo", "Trujillo"),
            station("chiclayo", "Chiclayo"),
        ]
    }

    fn loaded() -> Coordinator {
        let mut coordinator = Coordinator::new("lima", "Exitosa");
        coordinator.handle(Input::StationsLoaded(four_stations()));
        coordinator
    }

    fn play_seq(commands: &[Command]) -> Seq {
        commands
            .iter()
            .find_map(|command| match command {
                Command::Play { seq } => Some(*seq),
                _ => None,
            })
            .expect("play command")
    }

    fn load_seq(commands: &[Command]) -> Seq {
        commands
            .iter()
            .find_map(|command| match command {
                Command::Load { seq, .. } => Some(*seq),
                _ => None,
            })
            .expect("load command")
    }

    fn autoplay_token(commands: &[Command]) -> Seq {
        commands
            .iter()
            .find_map(|command| match command {
                Command::ArmAutoPlay { token } => Some(*token),
                _ => None,
            })
            .expect("auto-play armed")
    }

    /// Toggles play and lets the element accept it.
    fn start_playing(coordinator: &mut Coordinator) {
        let commands = coordinator.handle(Input::TogglePlay);
        let seq = play_seq(&commands);
        coordinator.handle(Input::Media(MediaEvent::PlayResolved { seq }));
        assert_eq!(coordinator.phase(), Phase::Playing);
    }

    fn metadata_for(station_id: &str, program: &str) -> MetadataState {
        MetadataState {
            station_id: Some(station_id.into()),
            current_program: Some(ScheduledProgram {
                id: Some(7),
                name: program.into(),
                host: Some("Nicolás Lúcar".into()),
                start_time: NaiveTime::from_hms_opt(22, 0, 0),
                end_time: NaiveTime::from_hms_opt(0, 0, 0),
                image: None,
                description: None,
            }),
            ..MetadataState::default()
        }
    }

    #[test]
    fn initial_placeholder_before_stations_load() {
        let coordinator = Coordinator::new("lima", "Exitosa");
        assert_eq!(coordinator.program_info(), ProgramInfo::new("Press play", ""));
        assert!(!coordinator.snapshot().stations_loaded);
    }

    #[test]
    fn navigation_wraps_around() {
        let mut coordinator = loaded();
        coordinator.handle(Input::PreviousStation);
        assert_eq!(coordinator.snapshot().current_station_index, 3);

        let mut coordinator = loaded();
        coordinator.handle(Input::NextStation);
        assert_eq!(coordinator.snapshot().current_station_index, 1);
    }

    #[test]
    fn navigation_on_an_empty_list_is_a_no_op() {
        let mut coordinator = Coordinator::new("lima", "Exitosa");
        coordinator.handle(Input::StationsLoaded(Vec::new()));
        assert!(coordinator.handle(Input::NextStation).iter().all(|c| !matches!(c, Command::Load { .. })));
        assert_eq!(coordinator.snapshot().current_station_index, 0);
        assert_eq!(coordinator.program_info().title, "Press play");
    }

    #[test]
    fn double_toggle_returns_to_paused() {
        let mut coordinator = loaded();
        let first = coordinator.handle(Input::TogglePlay);
        assert!(first.contains(&Command::Play { seq: play_seq(&first) }));
        assert!(coordinator.is_playing());
        assert!(coordinator.is_buffering());

        let second = coordinator.handle(Input::TogglePlay);
        assert!(second.contains(&Command::Pause));
        let snapshot = coordinator.snapshot();
        assert!(!snapshot.is_playing);
        assert!(!snapshot.is_buffering);
        assert!(snapshot.user_paused);
        assert_eq!(snapshot.current_station_index, 0);

        // the element may still honour the first request
        let late = coordinator.handle(Input::Media(MediaEvent::PlayResolved {
            seq: play_seq(&first),
        }));
        assert!(late.contains(&Command::Pause));
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn first_play_loads_the_source() {
        let mut coordinator = loaded();
        let commands = coordinator.handle(Input::TogglePlay);
        assert_eq!(
            commands[..2],
            [
                Command::Load {
                    seq: load_seq(&commands),
                    url: "https://streams.example.com/lima".into(),
                },
                Command::Play {
                    seq: play_seq(&commands)
                },
            ]
        );
        coordinator.handle(Input::Media(MediaEvent::PlayResolved {
            seq: play_seq(&commands),
        }));
        coordinator.handle(Input::TogglePlay);

        let again = coordinator.handle(Input::TogglePlay);
        assert!(again.iter().all(|c| !matches!(c, Command::Load { .. })));
    }

    #[test]
    fn auto_play_fires_once() {
        let mut coordinator = Coordinator::new("lima", "Exitosa");
        let commands = coordinator.handle(Input::StationsLoaded(four_stations()));
        assert!(commands.contains(&Command::SelectStation("lima".into())));
        let token = autoplay_token(&commands);

        let started = coordinator.handle(Input::AutoPlayDue { token });
        let seq = play_seq(&started);
        assert!(coordinator.snapshot().has_auto_played);
        coordinator.handle(Input::Media(MediaEvent::PlayResolved { seq }));

        // manual pause recreates the preconditions except for the gate
        coordinator.handle(Input::TogglePlay);
        start_playing(&mut coordinator);
        coordinator.handle(Input::TogglePlay);
        let commands = coordinator.handle(Input::AutoPlayDue { token });
        assert!(commands.iter().all(|c| !matches!(c, Command::Play { .. })));
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn rejected_auto_play_is_not_retried() {
        let mut coordinator = Coordinator::new("lima", "Exitosa");
        let token = autoplay_token(&coordinator.handle(Input::StationsLoaded(four_stations())));
        let seq = play_seq(&coordinator.handle(Input::AutoPlayDue { token }));

        let commands = coordinator.handle(Input::Media(MediaEvent::PlayRejected { seq }));
        assert!(commands.contains(&Command::ReportFailure(PlaybackFailure::PlayRejected)));
        assert!(commands.iter().all(|c| !matches!(c, Command::ArmAutoPlay { .. })));
        assert!(!coordinator.is_playing());
    }

    #[test]
    fn user_action_cancels_pending_auto_play() {
        let mut coordinator = Coordinator::new("lima", "Exitosa");
        let token = autoplay_token(&coordinator.handle(Input::StationsLoaded(four_stations())));
        coordinator.handle(Input::NextStation);
        let commands = coordinator.handle(Input::AutoPlayDue { token });
        assert!(commands.iter().all(|c| !matches!(c, Command::Play { .. })));
        assert!(!coordinator.snapshot().has_auto_played);
    }

    #[test]
    fn missing_default_station_falls_back_to_the_first() {
        let mut coordinator = Coordinator::new("cusco", "Exitosa");
        let commands = coordinator.handle(Input::StationsLoaded(four_stations()));
        assert_eq!(coordinator.snapshot().current_station_index, 0);
        assert!(commands.contains(&Command::SelectStation("lima".into())));
        autoplay_token(&commands);
    }

    #[test]
    fn lima_to_arequipa_resumes_playback() {
        let mut coordinator = loaded();
        start_playing(&mut coordinator);

        let commands = coordinator.handle(Input::NextStation);
        let seq = load_seq(&commands);
        assert_eq!(commands[0], Command::Pause);
        assert!(commands.contains(&Command::Load {
            seq,
            url: "https://streams.example.com/arequipa".into(),
        }));
        assert!(commands.contains(&Command::ArmLoadTimeout { seq }));
        assert!(commands.contains(&Command::SelectStation("arequipa".into())));

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.current_station_index, 1);
        assert!(snapshot.is_changing_station);
        assert_eq!(
            snapshot.program_info,
            ProgramInfo::new("Switching station...", "Exitosa Arequipa")
        );

        let ready = coordinator.handle(Input::Media(MediaEvent::CanPlay { seq }));
        let play = play_seq(&ready);
        coordinator.handle(Input::Media(MediaEvent::PlayResolved { seq: play }));
        let snapshot = coordinator.snapshot();
        assert!(snapshot.is_playing);
        assert!(!snapshot.is_changing_station);
        assert_eq!(snapshot.program_info, ProgramInfo::new("Live", "Exitosa Arequipa"));
    }

    #[test]
    fn switch_while_paused_shows_the_station() {
        let mut coordinator = loaded();
        let seq = load_seq(&coordinator.handle(Input::ChangeStation(2)));
        let ready = coordinator.handle(Input::Media(MediaEvent::CanPlay { seq }));
        assert!(ready.iter().all(|c| !matches!(c, Command::Play { .. })));
        assert_eq!(coordinator.phase(), Phase::Idle);
        let info = coordinator.program_info();
        assert_eq!(info.title, "Exitosa Trujillo");
        assert_eq!(info.subtitle, "Exitosa Trujillo");
    }

    #[test]
    fn load_timeout_shows_the_target_city() {
        let mut coordinator = loaded();
        start_playing(&mut coordinator);
        let seq = load_seq(&coordinator.handle(Input::NextStation));

        let commands = coordinator.handle(Input::LoadTimedOut { seq });
        assert!(commands.contains(&Command::ReportFailure(PlaybackFailure::LoadTimeout)));
        let snapshot = coordinator.snapshot();
        assert!(!snapshot.is_playing);
        assert!(!snapshot.is_buffering);
        assert!(!snapshot.is_changing_station);
        assert_eq!(
            snapshot.program_info,
            ProgramInfo::new("Failed to load", "Exitosa Arequipa")
        );

        // a late ready signal for the abandoned load changes nothing
        let late = coordinator.handle(Input::Media(MediaEvent::CanPlay { seq }));
        assert!(late.is_empty());
        assert!(!coordinator.is_playing());
    }

    #[test]
    fn manual_play_after_failure_reloads_the_source() {
        let mut coordinator = loaded();
        let seq = load_seq(&coordinator.handle(Input::NextStation));
        coordinator.handle(Input::Media(MediaEvent::Error { seq }));
        assert_eq!(coordinator.program_info().title, "Failed to load");

        let commands = coordinator.handle(Input::TogglePlay);
        assert!(commands.iter().any(|c| matches!(
            c,
            Command::Load { url, .. } if url == "https://streams.example.com/arequipa"
        )));
        assert_eq!(coordinator.snapshot().failure, None);
    }

    #[test]
    fn station_changes_are_ignored_while_switching() {
        let mut coordinator = loaded();
        coordinator.handle(Input::NextStation);
        let commands = coordinator.handle(Input::ChangeStation(3));
        assert!(commands.is_empty());
        assert_eq!(coordinator.snapshot().current_station_index, 1);
        assert!(coordinator.handle(Input::ChangeStation(1)).is_empty());
    }

    #[test]
    fn toggle_during_switch_flips_the_resume_intent() {
        let mut coordinator = loaded();
        start_playing(&mut coordinator);
        let seq = load_seq(&coordinator.handle(Input::NextStation));

        coordinator.handle(Input::TogglePlay);
        assert!(coordinator.snapshot().user_paused);
        let ready = coordinator.handle(Input::Media(MediaEvent::CanPlay { seq }));
        assert!(ready.iter().all(|c| !matches!(c, Command::Play { .. })));
        assert!(!coordinator.is_playing());
    }

    #[test]
    fn stray_play_events_are_reversed() {
        let mut coordinator = loaded();
        let commands = coordinator.handle(Input::Media(MediaEvent::Play));
        assert_eq!(commands, vec![Command::Pause]);

        start_playing(&mut coordinator);
        assert!(coordinator.handle(Input::Media(MediaEvent::Play)).is_empty());

        coordinator.handle(Input::NextStation);
        assert!(coordinator.handle(Input::Media(MediaEvent::Play)).is_empty());
    }

    #[test]
    fn stale_media_errors_are_ignored() {
        let mut coordinator = loaded();
        let first = load_seq(&coordinator.handle(Input::NextStation));
        coordinator.handle(Input::Media(MediaEvent::CanPlay { seq: first }));
        coordinator.handle(Input::NextStation);

        let commands = coordinator.handle(Input::Media(MediaEvent::Error { seq: first }));
        assert!(commands.is_empty());
        assert!(coordinator.snapshot().is_changing_station);
    }

    #[test]
    fn stalls_while_playing_report_buffering() {
        let mut coordinator = loaded();
        start_playing(&mut coordinator);
        coordinator.handle(Input::Media(MediaEvent::Waiting));
        assert!(coordinator.is_buffering());
        coordinator.handle(Input::Media(MediaEvent::Playing));
        assert!(!coordinator.is_buffering());
    }

    #[test]
    fn transport_commands_route_to_the_same_entry_points() {
        let mut coordinator = loaded();
        let commands = coordinator.handle(Input::Transport(TransportCommand::Play));
        let seq = play_seq(&commands);
        coordinator.handle(Input::Media(MediaEvent::PlayResolved { seq }));

        assert!(coordinator
            .handle(Input::Transport(TransportCommand::Play))
            .is_empty());
        coordinator.handle(Input::Transport(TransportCommand::Stop));
        assert!(coordinator.snapshot().user_paused);

        coordinator.handle(Input::Transport(TransportCommand::PreviousTrack));
        assert_eq!(coordinator.snapshot().current_station_index, 3);
    }

    #[test]
    fn metadata_for_other_stations_is_ignored() {
        let mut coordinator = loaded();
        coordinator.handle(Input::Metadata(metadata_for("arequipa", "Arequipa al día")));
        assert_eq!(coordinator.snapshot().current_program, None);

        coordinator.handle(Input::Metadata(metadata_for("lima", "Hablemos Claro")));
        assert_eq!(
            coordinator.snapshot().current_program.map(|p| p.name),
            Some("Hablemos Claro".to_string())
        );

        coordinator.handle(Input::NextStation);
        assert_eq!(coordinator.snapshot().current_program, None);
    }

    #[test]
    fn now_playing_follows_the_program_while_playing() {
        let mut coordinator = loaded();
        coordinator.handle(Input::Metadata(metadata_for("lima", "Hablemos Claro")));
        let commands = coordinator.handle(Input::TogglePlay);
        assert!(commands.contains(&Command::PublishPlaybackState(PlaybackState::Playing)));
        assert!(commands.iter().all(|c| !matches!(c, Command::PublishMetadata(_))));

        let commands = coordinator.handle(Input::Media(MediaEvent::PlayResolved {
            seq: play_seq(&commands),
        }));
        assert!(commands.contains(&Command::RefetchMetadata));
        let published = commands.iter().find_map(|c| match c {
            Command::PublishMetadata(metadata) => Some(metadata.clone()),
            _ => None,
        });
        let published = published.expect("metadata published");
        assert_eq!(published.title, "Hablemos Claro");
        assert_eq!(published.artist, "Nicolás Lúcar");
        assert_eq!(published.album, "Exitosa Lima");

        // unchanged metadata is not republished
        let again = coordinator.handle(Input::Metadata(metadata_for("lima", "Hablemos Claro")));
        assert!(again.is_empty());

        let info = coordinator.program_info();
        assert_eq!(info.title, "Hablemos Claro");
        assert_eq!(info.subtitle, "Nicolás Lúcar");

        let paused = coordinator.handle(Input::TogglePlay);
        assert!(paused.contains(&Command::PublishPlaybackState(PlaybackState::Paused)));
    }

    #[test]
    fn progress_ticks_only_while_playing() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 14)
            .and_then(|day| day.and_hms_opt(23, 0, 0))
            .unwrap();
        let mut coordinator = loaded();
        coordinator.handle(Input::Metadata(metadata_for("lima", "Hablemos Claro")));
        coordinator.handle(Input::Tick(now));
        assert_eq!(coordinator.snapshot().program_progress, 0.0);

        start_playing(&mut coordinator);
        coordinator.handle(Input::Tick(now));
        assert!((coordinator.snapshot().program_progress - 50.0).abs() < 1e-9);

        coordinator.handle(Input::TogglePlay);
        coordinator.handle(Input::Tick(now));
        assert_eq!(coordinator.snapshot().program_progress, 0.0);
    }
}
