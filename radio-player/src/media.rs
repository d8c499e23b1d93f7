use tokio::sync::mpsc::UnboundedSender;

/// Identifies one source assignment or play request. Results tagged with an
/// older sequence number than the one awaited are dropped.
pub type Seq = u64;

/// Notifications from the playback element back into the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    LoadStart { seq: Seq },
    /// Enough data is buffered to start playing the source loaded under `seq`.
    CanPlay { seq: Seq },
    Waiting,
    Playing,
    /// The element started playing, for whatever reason.
    Play,
    Error { seq: Seq },
    PlayResolved { seq: Seq },
    PlayRejected { seq: Seq },
}

/// The single audio output. Only the coordinator task holds it.
///
/// Implementations report progress through the sender passed to `attach`,
/// tagging each result with the sequence number of the call it answers.
pub trait MediaElement: Send {
    fn attach(&mut self, events: UnboundedSender<MediaEvent>);

    /// Replaces the source and starts loading it.
    fn load(&mut self, seq: Seq, url: &str);

    /// Asks the element to start playing; answered by `PlayResolved` or
    /// `PlayRejected` with the same `seq`.
    fn play(&mut self, seq: Seq);

    fn pause(&mut self);

    /// Rewinds to the live edge so resuming does not replay stale audio.
    fn seek_to_live_edge(&mut self);
}
