use serde::{Deserialize, Serialize};

use crate::models::{ResolvedProgram, Station};

const FAVICON: &str = "/favicon.ico";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artwork {
    pub src: String,
    pub sizes: &'static str,
    #[serde(rename = "type")]
    pub mime_type: &'static str,
}

impl Artwork {
    fn new(src: impl Into<String>, sizes: &'static str, mime_type: &'static str) -> Self {
        Self {
            src: src.into(),
            sizes,
            mime_type,
        }
    }
}

/// What the operating system's media controls should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NowPlayingMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Vec<Artwork>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Hardware keys and lock-screen buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportCommand {
    Play,
    Pause,
    Stop,
    PreviousTrack,
    NextTrack,
}

/// Host hook for the platform's now-playing surface.
pub trait NowPlayingIntegration: Send {
    fn publish_metadata(&mut self, metadata: &NowPlayingMetadata);

    fn publish_playback_state(&mut self, state: PlaybackState);
}

/// Builds the now-playing card. While playing a known program the program
/// leads; otherwise the station identity does.
pub fn compose_metadata(
    station: &Station,
    program: Option<&ResolvedProgram>,
    playing: bool,
    brand: &str,
) -> NowPlayingMetadata {
    let location = format!("{brand} {}", station.city);
    let fallback_artist = format!("Radio {brand}");

    let (title, artist, album) = match program {
        Some(program) if playing && program.name != station.name => (
            program.name.clone(),
            program.host.clone().unwrap_or(fallback_artist),
            location,
        ),
        _ => (station.name.clone(), location, fallback_artist),
    };

    let mut artwork = Vec::with_capacity(3);
    if let Some(image) = program.and_then(|p| p.image.as_deref()) {
        if station.image.as_deref() != Some(image) {
            artwork.push(Artwork::new(image, "500x500", "image/jpeg"));
        }
    }
    if let Some(image) = station.image.as_deref() {
        artwork.push(Artwork::new(image, "256x256", "image/png"));
    }
    artwork.push(Artwork::new(FAVICON, "64x64", "image/x-icon"));

    NowPlayingMetadata {
        title,
        artist,
        album,
        artwork,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgramSource;
    use pretty_assertions::assert_eq;

    fn lima() -> Station {
        Station {
            id: "lima".into(),
            name: "Exitosa Lima".into(),
            url: "https://aacplus.rstreaming.net:7190/stream".into(),
            image: Some("/radios/exitosa-lima.png".into()),
            description: None,
            region: "lima".into(),
            city: "Lima".into(),
        }
    }

    fn program(host: Option<&str>) -> ResolvedProgram {
        ResolvedProgram {
            name: "Exitosa te escucha".into(),
            host: host.map(Into::into),
            image: Some("/programs/te-escucha.jpg".into()),
            source: ProgramSource::Schedule,
        }
    }

    #[test]
    fn program_leads_while_playing() {
        let metadata = compose_metadata(&lima(), Some(&program(Some("Nicolás Lúcar"))), true, "Exitosa");
        assert_eq!(metadata.title, "Exitosa te escucha");
        assert_eq!(metadata.artist, "Nicolás Lúcar");
        assert_eq!(metadata.album, "Exitosa Lima");
        assert_eq!(
            metadata.artwork,
            vec![
                Artwork::new("/programs/te-escucha.jpg", "500x500", "image/jpeg"),
                Artwork::new("/radios/exitosa-lima.png", "256x256", "image/png"),
                Artwork::new("/favicon.ico", "64x64", "image/x-icon"),
            ]
        );
    }

    #[test]
    fn missing_host_uses_the_brand() {
        let metadata = compose_metadata(&lima(), Some(&program(None)), true, "Exitosa");
        assert_eq!(metadata.artist, "Radio Exitosa");
    }

    #[test]
    fn station_identity_when_not_playing() {
        let metadata = compose_metadata(&lima(), Some(&program(Some("Nicolás Lúcar"))), false, "Exitosa");
        assert_eq!(metadata.title, "Exitosa Lima");
        assert_eq!(metadata.artist, "Exitosa Lima");
        assert_eq!(metadata.album, "Radio Exitosa");
    }

    #[test]
    fn program_image_equal_to_station_image_is_not_repeated() {
        let mut program = program(None);
        program.image = Some("/radios/exitosa-lima.png".into());
        let metadata = compose_metadata(&lima(), Some(&program), true, "Exitosa");
        assert_eq!(metadata.artwork.len(), 2);
        assert_eq!(metadata.artwork[0].sizes, "256x256");
    }
}
