//! Desktop feedback channels. Haptics are logged; audio is logged by default
//! and synthesized through cpal with the `cpal-audio` feature.

use forcecue_core::SoundName;
use forcecue_playback::{FeedbackError, Haptics, PlayingSound, SoundPlayer};

use crate::tone::ToneProfile;

#[derive(Debug, Clone, Default)]
pub struct TracingHaptics {
    pub patterns: usize,
}

impl Haptics for TracingHaptics {
    fn supported(&self) -> bool {
        true
    }

    fn vibrate(&mut self, pattern: &[u64]) -> Result<(), FeedbackError> {
        self.patterns += 1;
        tracing::debug!(?pattern, "vibrate");
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), FeedbackError> {
        tracing::debug!("vibration cancelled");
        Ok(())
    }
}

#[derive(Debug)]
pub struct LoggedSound {
    id: u64,
}

impl PlayingSound for LoggedSound {
    fn stop(&mut self) -> Result<(), FeedbackError> {
        tracing::trace!(id = self.id, "sound stopped");
        Ok(())
    }

    fn unload(self) -> Result<(), FeedbackError> {
        tracing::trace!(id = self.id, "sound unloaded");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TracingPlayer {
    next_id: u64,
}

impl SoundPlayer for TracingPlayer {
    type Handle = LoggedSound;

    fn play(&mut self, sound: SoundName, volume: f32) -> Result<LoggedSound, FeedbackError> {
        let id = self.next_id;
        self.next_id += 1;
        let tone = ToneProfile::for_sound(sound);
        tracing::info!(%sound, volume, ms = tone.duration().as_millis() as u64, "beep");
        Ok(LoggedSound { id })
    }
}

#[cfg(feature = "cpal-audio")]
pub use self::device::{CpalPlayer, CpalSound};

#[cfg(feature = "cpal-audio")]
mod device {
    use super::*;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, Stream, SupportedStreamConfig};

    /// Plays each sound as a fresh output stream on the default device.
    pub struct CpalPlayer {
        device: cpal::Device,
        config: SupportedStreamConfig,
    }

    pub struct CpalSound {
        stream: Option<Stream>,
    }

    impl PlayingSound for CpalSound {
        fn stop(&mut self) -> Result<(), FeedbackError> {
            match &self.stream {
                Some(stream) => stream.pause().map_err(|e| FeedbackError::Audio(e.to_string())),
                None => Ok(()),
            }
        }

        fn unload(mut self) -> Result<(), FeedbackError> {
            self.stream.take();
            Ok(())
        }
    }

    impl CpalPlayer {
        pub fn open_default() -> Result<Self, FeedbackError> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| FeedbackError::Audio("no output device".into()))?;
            let config = device
                .default_output_config()
                .map_err(|e| FeedbackError::Audio(e.to_string()))?;
            tracing::info!(
                device = %device.name().unwrap_or_default(),
                sample_rate = config.sample_rate().0,
                "audio output ready"
            );
            Ok(Self { device, config })
        }

        fn build(&self, sound: SoundName, volume: f32) -> Result<Stream, cpal::BuildStreamError> {
            let tone = ToneProfile::for_sound(sound);
            let sample_rate = self.config.sample_rate().0;
            let channels = self.config.channels() as usize;
            let gain = volume.clamp(0.0, 1.0);
            let mut index = 0usize;
            let mut next = move || {
                let s = tone.sample(index, sample_rate) * gain;
                index += 1;
                s
            };
            let on_error = |e: cpal::StreamError| tracing::warn!(error = %e, "audio stream error");
            let config = self.config.config();

            match self.config.sample_format() {
                SampleFormat::I16 => self.device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _| {
                        for frame in data.chunks_mut(channels) {
                            let s = (next() * i16::MAX as f32) as i16;
                            frame.fill(s);
                        }
                    },
                    on_error,
                    None,
                ),
                SampleFormat::U16 => self.device.build_output_stream(
                    &config,
                    move |data: &mut [u16], _| {
                        let center = (u16::MAX / 2) as f32;
                        for frame in data.chunks_mut(channels) {
                            let s = (next() * center + center) as u16;
                            frame.fill(s);
                        }
                    },
                    on_error,
                    None,
                ),
                _ => self.device.build_output_stream(
                    &config,
                    move |data: &mut [f32], _| {
                        for frame in data.chunks_mut(channels) {
                            frame.fill(next());
                        }
                    },
                    on_error,
                    None,
                ),
            }
        }
    }

    impl SoundPlayer for CpalPlayer {
        type Handle = CpalSound;

        fn play(&mut self, sound: SoundName, volume: f32) -> Result<CpalSound, FeedbackError> {
            let stream = self
                .build(sound, volume)
                .map_err(|e| FeedbackError::Audio(e.to_string()))?;
            stream
                .play()
                .map_err(|e| FeedbackError::Audio(e.to_string()))?;
            tracing::debug!(%sound, volume, "beep");
            Ok(CpalSound {
                stream: Some(stream),
            })
        }
    }
}

pub enum AppPlayer {
    Logged(TracingPlayer),
    #[cfg(feature = "cpal-audio")]
    Device(CpalPlayer),
}

pub enum AppSound {
    Logged(LoggedSound),
    #[cfg(feature = "cpal-audio")]
    Device(CpalSound),
}

impl AppPlayer {
    /// The output device when built with `cpal-audio` and one is available,
    /// otherwise the log sink.
    pub fn detect() -> Self {
        #[cfg(feature = "cpal-audio")]
        match CpalPlayer::open_default() {
            Ok(player) => return AppPlayer::Device(player),
            Err(e) => tracing::warn!(error = %e, "falling back to logged audio"),
        }
        AppPlayer::Logged(TracingPlayer::default())
    }
}

impl SoundPlayer for AppPlayer {
    type Handle = AppSound;

    fn play(&mut self, sound: SoundName, volume: f32) -> Result<AppSound, FeedbackError> {
        match self {
            AppPlayer::Logged(p) => p.play(sound, volume).map(AppSound::Logged),
            #[cfg(feature = "cpal-audio")]
            AppPlayer::Device(p) => p.play(sound, volume).map(AppSound::Device),
        }
    }
}

impl PlayingSound for AppSound {
    fn stop(&mut self) -> Result<(), FeedbackError> {
        match self {
            AppSound::Logged(s) => s.stop(),
            #[cfg(feature = "cpal-audio")]
            AppSound::Device(s) => s.stop(),
        }
    }

    fn unload(self) -> Result<(), FeedbackError> {
        match self {
            AppSound::Logged(s) => s.unload(),
            #[cfg(feature = "cpal-audio")]
            AppSound::Device(s) => s.unload(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forcecue_core::{Band, Settings};
    use forcecue_playback::FeedbackDispatcher;

    #[test]
    fn logged_channels_accept_every_request() {
        let mut dispatcher = FeedbackDispatcher::new(TracingHaptics::default(), TracingPlayer::default());
        assert!(dispatcher.vibrate(Band::High, &Settings::default()).unwrap());
        dispatcher.beep(SoundName::Gta, 0.4).unwrap();
        dispatcher.beep(SoundName::Scan, 0.4).unwrap();
        assert!(dispatcher.beep_active());
        dispatcher.silence().unwrap();
        assert!(!dispatcher.beep_active());
        assert_eq!(dispatcher.haptics().patterns, 1);
    }

    #[test]
    fn app_player_wraps_handles() {
        let mut player = AppPlayer::Logged(TracingPlayer::default());
        let mut sound = player.play(SoundName::Electronic, 1.0).unwrap();
        sound.stop().unwrap();
        sound.unload().unwrap();
    }
}
