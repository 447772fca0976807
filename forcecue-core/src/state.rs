/// Playback lifecycle. `Paused` keeps the start instant, `Idle` clears it.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Paused,
}

impl PlaybackState {
    pub fn is_running(&self) -> bool {
        matches!(self, PlaybackState::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "stopped",
            PlaybackState::Running => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}
