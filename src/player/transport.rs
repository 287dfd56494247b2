/// The playback mode of the single audio channel.
///
/// `Stopped` means nothing is loaded (or the queue ran out); `Paused` means a
/// track is loaded and the user halted it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl TransportState {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}
