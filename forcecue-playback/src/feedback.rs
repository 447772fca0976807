//! Platform feedback channels and the dispatcher that drives them.
//!
//! Channels are opaque services: a vibrator that plays millisecond patterns and
//! a short-sound player. Failures are returned to the caller, which logs them
//! and keeps playing.

use forcecue_core::{Band, Settings, SoundName};

use crate::error::FeedbackError;

pub trait Haptics {
    /// `false` on platforms without a vibrator; patterns are then skipped.
    fn supported(&self) -> bool;
    fn vibrate(&mut self, pattern: &[u64]) -> Result<(), FeedbackError>;
    fn cancel(&mut self) -> Result<(), FeedbackError>;
}

pub trait PlayingSound {
    fn stop(&mut self) -> Result<(), FeedbackError>;
    fn unload(self) -> Result<(), FeedbackError>;
}

pub trait SoundPlayer {
    type Handle: PlayingSound;
    fn play(&mut self, sound: SoundName, volume: f32) -> Result<Self::Handle, FeedbackError>;
}

/// Holds at most one live sound. The previous sound is stopped and unloaded
/// before a new one is stored, and on drop.
pub struct SoundSlot<S: PlayingSound> {
    current: Option<S>,
}

impl<S: PlayingSound> SoundSlot<S> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Stops and unloads the held sound. Unload is attempted even when stop
    /// fails; the first error is returned.
    pub fn release(&mut self) -> Result<(), FeedbackError> {
        let Some(mut sound) = self.current.take() else {
            return Ok(());
        };
        let stopped = sound.stop();
        let unloaded = sound.unload();
        stopped.and(unloaded)
    }

    fn hold(&mut self, sound: S) {
        debug_assert!(self.current.is_none());
        self.current = Some(sound);
    }
}

impl<S: PlayingSound> Default for SoundSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlayingSound> Drop for SoundSlot<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to release sound on drop");
        }
    }
}

pub struct FeedbackDispatcher<H: Haptics, P: SoundPlayer> {
    haptics: H,
    player: P,
    beep: SoundSlot<P::Handle>,
    preview: SoundSlot<P::Handle>,
}

impl<H: Haptics, P: SoundPlayer> FeedbackDispatcher<H, P> {
    pub fn new(haptics: H, player: P) -> Self {
        Self {
            haptics,
            player,
            beep: SoundSlot::new(),
            preview: SoundSlot::new(),
        }
    }

    /// Plays the band's pattern when vibration is on and supported. Returns
    /// whether a pattern was issued.
    pub fn vibrate(&mut self, band: Band, settings: &Settings) -> Result<bool, FeedbackError> {
        if !settings.vibration || !self.haptics.supported() {
            return Ok(false);
        }
        self.haptics.vibrate(band.vibration_pattern())?;
        Ok(true)
    }

    pub fn cancel_vibration(&mut self) -> Result<(), FeedbackError> {
        if !self.haptics.supported() {
            return Ok(());
        }
        self.haptics.cancel()
    }

    /// One metronome beep. The previous beep is released first; a failed
    /// release does not prevent the new beep.
    pub fn beep(&mut self, sound: SoundName, volume: f32) -> Result<(), FeedbackError> {
        let released = self.beep.release();
        let handle = self.player.play(sound, volume)?;
        self.beep.hold(handle);
        released
    }

    pub fn preview(&mut self, sound: SoundName, volume: f32) -> Result<(), FeedbackError> {
        let released = self.preview.release();
        let handle = self.player.play(sound, volume)?;
        self.preview.hold(handle);
        released
    }

    /// Stops the metronome sound and any test sound.
    pub fn silence(&mut self) -> Result<(), FeedbackError> {
        let beep = self.beep.release();
        let preview = self.preview.release();
        beep.and(preview)
    }

    pub fn beep_active(&self) -> bool {
        !self.beep.is_empty()
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn previous_beep_is_released_before_next_plays() {
        let (log, haptics, player) = channels();
        let mut dispatcher = FeedbackDispatcher::new(haptics, player);

        dispatcher.beep(SoundName::Scan, 0.5).unwrap();
        dispatcher.beep(SoundName::Gta, 0.7).unwrap();

        assert_eq!(
            calls(&log),
            vec![
                Call::Play(SoundName::Scan, 0.5, 0),
                Call::Stop(0),
                Call::Unload(0),
                Call::Play(SoundName::Gta, 0.7, 1),
            ]
        );
        assert!(dispatcher.beep_active());
    }

    #[test]
    fn silence_and_drop_release_handles() {
        let (log, haptics, player) = channels();
        let mut dispatcher = FeedbackDispatcher::new(haptics, player);
        dispatcher.beep(SoundName::Scan, 0.5).unwrap();
        dispatcher.silence().unwrap();
        assert!(!dispatcher.beep_active());

        dispatcher.preview(SoundName::Electronic, 1.0).unwrap();
        drop(dispatcher);

        let log = calls(&log);
        assert!(log.ends_with(&[Call::Stop(1), Call::Unload(1)]));
        assert!(log.contains(&Call::Unload(0)));
    }

    #[test]
    fn silence_releases_test_sound() {
        let (log, haptics, player) = channels();
        let mut dispatcher = FeedbackDispatcher::new(haptics, player);
        dispatcher.preview(SoundName::Gta, 0.5).unwrap();
        dispatcher.silence().unwrap();
        drop(dispatcher);
        assert_eq!(
            calls(&log),
            vec![
                Call::Play(SoundName::Gta, 0.5, 0),
                Call::Stop(0),
                Call::Unload(0),
            ]
        );
    }

    #[test]
    fn vibration_respects_setting_and_platform() {
        let (log, mut haptics, player) = channels();
        haptics.supported = false;
        let mut unsupported = FeedbackDispatcher::new(haptics, player.clone());
        let settings = Settings::default();
        assert!(!unsupported.vibrate(Band::Critical, &settings).unwrap());

        let (_, haptics, _) = channels();
        let haptics = RecordingHaptics {
            log: log.clone(),
            ..haptics
        };
        let mut dispatcher = FeedbackDispatcher::new(haptics, player);
        let off = Settings {
            vibration: false,
            ..Settings::default()
        };
        assert!(!dispatcher.vibrate(Band::High, &off).unwrap());
        assert!(dispatcher.vibrate(Band::High, &settings).unwrap());

        assert_eq!(calls(&log), vec![Call::Vibrate(vec![0, 300, 100, 300])]);
    }

    #[test]
    fn failed_play_leaves_slot_empty() {
        let (_, haptics, mut player) = channels();
        player.fail = true;
        let mut dispatcher = FeedbackDispatcher::new(haptics, player);
        assert_eq!(
            dispatcher.beep(SoundName::Scan, 0.5),
            Err(FeedbackError::Audio("device busy".into()))
        );
        assert!(!dispatcher.beep_active());
    }
}
