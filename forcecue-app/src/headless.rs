//! Terminal replay without a window.

use forcecue_core::Band;
use forcecue_playback::{Haptics, PlaybackSession, SessionEvent, SoundPlayer};
use forcecue_timing::Timer;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub samples: usize,
    pub alerts: Vec<Band>,
    pub beeps: usize,
    pub peak_force: f64,
    pub elapsed: f64,
    pub feedback_failures: usize,
}

impl ReplaySummary {
    fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Sample { force, elapsed, .. } => {
                self.samples += 1;
                self.peak_force = self.peak_force.max(*force);
                self.elapsed = *elapsed;
            }
            SessionEvent::Alert(band) => self.alerts.push(*band),
            SessionEvent::Beep(_) => self.beeps += 1,
            SessionEvent::FeedbackFailed(_) => self.feedback_failures += 1,
            _ => {}
        }
    }
}

pub(crate) fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::Sample {
            elapsed,
            force,
            label,
        } => tracing::debug!(elapsed = format_args!("{elapsed:.2}"), force = format_args!("{force:.4}"), label = label.as_str().unwrap_or(""), "sample"),
        SessionEvent::Alert(band) => tracing::info!(alert = band.alert_message(), "alert"),
        SessionEvent::TempoChanged(tempo) => tracing::info!(bpm = tempo.bpm(), "tempo"),
        SessionEvent::AutoStopped { elapsed } => {
            tracing::info!(elapsed = format_args!("{elapsed:.2}"), "trial finished")
        }
        SessionEvent::DatasetSwitched(key) => tracing::info!(dataset = %key, "dataset"),
        SessionEvent::DatasetRejected { key, reason } => {
            tracing::error!(key = %key, %reason, "dataset rejected")
        }
        other => tracing::trace!(?other, "session event"),
    }
}

/// Plays the session's current dataset from the start until it stops on its
/// own, sleeping on `timer` between task deadlines.
pub fn replay<T, H, P>(
    session: &mut PlaybackSession<T, H, P>,
    timer: &T,
    idle_wait: Duration,
) -> ReplaySummary
where
    T: Timer<Timestamp = u64>,
    H: Haptics,
    P: SoundPlayer,
{
    let mut summary = ReplaySummary::default();
    session.reset();
    tracing::info!(
        dataset = %session.dataset().key,
        samples = session.dataset().samples.len(),
        seconds = session.dataset().end_time(),
        "replaying"
    );
    for event in session.toggle_play() {
        log_event(&event);
    }

    loop {
        let events = session.update();
        let mut finished = false;
        for event in &events {
            log_event(event);
            summary.record(event);
            finished |= matches!(event, SessionEvent::AutoStopped { .. });
        }
        if finished || !session.state().is_running() {
            break;
        }
        timer.sleep(session.until_next_task().unwrap_or(idle_wait));
    }

    tracing::info!(
        samples = summary.samples,
        alerts = summary.alerts.len(),
        beeps = summary.beeps,
        peak = format_args!("{:.4}", summary.peak_force),
        "replay complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{TracingHaptics, TracingPlayer};
    use forcecue_core::{Label, Settings, TrialSample};
    use forcecue_playback::{DatasetRegistry, PlaybackConfig, SettingsStore, TrialKey};
    use forcecue_timing::ManualTimer;
    use std::sync::Arc;

    fn session(
        audio: bool,
    ) -> (
        PlaybackSession<ManualTimer, TracingHaptics, TracingPlayer>,
        ManualTimer,
    ) {
        let registry = DatasetRegistry::new().with(
            TrialKey::Surgeon1Trial1,
            vec![
                TrialSample::new(0.0, 0.01, Label::None),
                TrialSample::new(0.5, 0.062, Label::Yellow4),
                TrialSample::new(1.0, 0.09, Label::Red),
                TrialSample::new(2.0, 0.03, Label::None),
            ],
        );
        let mut store = SettingsStore::new(Settings {
            audio,
            ..Settings::default()
        });
        let timer = ManualTimer::new();
        let session = PlaybackSession::new(
            PlaybackConfig::default(),
            Arc::new(registry),
            store.subscribe(),
            timer.clone(),
            TracingHaptics::default(),
            TracingPlayer::default(),
        )
        .unwrap();
        (session, timer)
    }

    #[test]
    fn replays_until_auto_stop() {
        let (mut session, timer) = session(true);
        let summary = replay(&mut session, &timer, Duration::from_millis(50));

        assert_eq!(summary.alerts, vec![Band::Medium, Band::Critical]);
        assert_eq!(summary.peak_force, 0.09);
        assert!(summary.elapsed > 2.0);
        assert!(summary.beeps > 0);
        assert_eq!(summary.feedback_failures, 0);
        // One poll every 50 ms over just past two seconds.
        assert_eq!(summary.samples, 41);
        assert!(!session.state().is_running());
        assert!(session.feedback().haptics().patterns > 0);
    }

    #[test]
    fn silent_replay_has_no_beeps() {
        let (mut session, timer) = session(false);
        let summary = replay(&mut session, &timer, Duration::from_millis(50));
        assert_eq!(summary.beeps, 0);
        assert_eq!(summary.alerts.len(), 2);
    }
}
