pub mod classify;
pub mod config;
pub mod error;
pub mod feedback;
pub mod locate;
pub mod registry;
pub mod session;
pub mod settings;

pub use classify::{Classification, classify};
pub use config::PlaybackConfig;
pub use error::{DatasetError, FeedbackError, PlaybackError};
pub use feedback::{FeedbackDispatcher, Haptics, PlayingSound, SoundPlayer, SoundSlot};
pub use locate::locate;
pub use registry::{Dataset, DatasetRegistry, TrialKey};
pub use session::{PlaybackSession, PlaybackView, SessionEvent};
pub use settings::{SettingsStore, SettingsSubscription};
