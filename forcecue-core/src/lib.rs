pub mod band;
pub mod sample;
pub mod settings;
pub mod sound;
pub mod state;
pub mod thresholds;

pub use band::{Band, Tempo};
pub use sample::{Label, TrialSample};
pub use settings::{Settings, SettingsUpdate};
pub use sound::SoundName;
pub use state::PlaybackState;
