use url::Url;

/// The video player shown next to the audio controls. It has no link to the
/// playback coordinator: showing or hiding it never touches the audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvPanel {
    embed_url: Option<Url>,
    visible: bool,
}

impl TvPanel {
    /// Starts visible when there is something to embed.
    pub fn new(embed_url: Option<Url>) -> Self {
        let visible = embed_url.is_some();
        Self { embed_url, visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flips visibility and returns the new value. Without an embed URL the
    /// panel stays hidden.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible && self.embed_url.is_some();
        self.visible
    }

    /// URL to embed, only while the panel is shown.
    pub fn embed_url(&self) -> Option<&Url> {
        self.embed_url.as_ref().filter(|_| self.visible)
    }
}
