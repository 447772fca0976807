use forcecue_core::{Band, Label, PlaybackState, Settings, SoundName, Tempo};
use forcecue_timing::{RepeatingTask, Timer};
use std::sync::Arc;
use std::time::Duration;

use crate::classify::{classify, next_tempo};
use crate::config::PlaybackConfig;
use crate::error::{DatasetError, FeedbackError, PlaybackError};
use crate::feedback::{FeedbackDispatcher, Haptics, SoundPlayer};
use crate::locate::locate;
use crate::registry::{Dataset, DatasetRegistry, TrialKey};
use crate::settings::SettingsSubscription;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    Sample {
        elapsed: f64,
        force: f64,
        label: Label,
    },
    Alert(Band),
    TempoChanged(Tempo),
    Beep(SoundName),
    AutoStopped {
        elapsed: f64,
    },
    DatasetSwitched(TrialKey),
    DatasetRejected {
        key: String,
        reason: String,
    },
    FeedbackFailed(FeedbackError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackView {
    pub state: PlaybackState,
    pub dataset: TrialKey,
    pub elapsed: f64,
    pub end_time: f64,
    pub current_force: Option<f64>,
    pub last_alert: Option<Band>,
    pub tempo: Tempo,
}

/// Replays one trial at a time and drives the feedback channels.
///
/// Two repeating tasks are owned here: the sample poll at a fixed period and
/// the metronome beep at `60 / tempo` seconds. Both are polled from
/// [`PlaybackSession::update`], so the session needs no threads of its own.
pub struct PlaybackSession<T, H, P>
where
    T: Timer<Timestamp = u64>,
    H: Haptics,
    P: SoundPlayer,
{
    timer: T,
    config: PlaybackConfig,
    registry: Arc<DatasetRegistry>,
    dataset: Dataset,
    settings: Arc<Settings>,
    subscription: SettingsSubscription,
    feedback: FeedbackDispatcher<H, P>,

    state: PlaybackState,
    started_at: Option<u64>,
    elapsed: f64,
    current_force: Option<f64>,
    last_alert: Option<Band>,
    tempo: Tempo,

    poll: Option<RepeatingTask>,
    beep: Option<RepeatingTask>,
}

impl<T, H, P> PlaybackSession<T, H, P>
where
    T: Timer<Timestamp = u64>,
    H: Haptics,
    P: SoundPlayer,
{
    /// Fails when the dataset named in the current settings cannot be played.
    pub fn new(
        config: PlaybackConfig,
        registry: Arc<DatasetRegistry>,
        subscription: SettingsSubscription,
        timer: T,
        haptics: H,
        player: P,
    ) -> Result<Self, PlaybackError> {
        let settings = subscription.current();
        let dataset = registry.resolve(&settings.data_source)?;
        tracing::info!(dataset = %dataset.key, samples = dataset.samples.len(), "session ready");

        Ok(Self {
            timer,
            tempo: config.initial_tempo(),
            config,
            registry,
            dataset,
            settings,
            subscription,
            feedback: FeedbackDispatcher::new(haptics, player),
            state: PlaybackState::Idle,
            started_at: None,
            elapsed: 0.0,
            current_force: None,
            last_alert: None,
            poll: None,
            beep: None,
        })
    }

    /// Resuming from pause keeps the first start instant, so the paused
    /// interval counts as elapsed playback time.
    pub fn toggle_play(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        match self.state {
            PlaybackState::Idle | PlaybackState::Paused => {
                let now = self.timer.now();
                let resumed = self.state == PlaybackState::Paused;
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.state = PlaybackState::Running;
                self.schedule_tasks(now);
                tracing::info!(dataset = %self.dataset.key, resumed, "playback running");
                events.push(if resumed {
                    SessionEvent::Resumed
                } else {
                    SessionEvent::Started
                });
            }
            PlaybackState::Running => {
                self.state = PlaybackState::Paused;
                self.cancel_tasks(&mut events);
                tracing::info!(elapsed = self.elapsed, "playback paused");
                events.push(SessionEvent::Paused);
            }
        }
        events
    }

    /// Back to `Idle` with nothing displayed, whatever the prior state.
    pub fn reset(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        self.state = PlaybackState::Idle;
        self.started_at = None;
        self.elapsed = 0.0;
        self.current_force = None;
        self.last_alert = None;
        self.cancel_tasks(&mut events);
        if let Err(e) = self.feedback.cancel_vibration() {
            Self::feedback_failed(&mut events, e);
        }
        tracing::debug!("playback reset");
        events.push(SessionEvent::Reset);
        events
    }

    /// Resets playback, then makes `key` the active dataset. On error nothing
    /// changes.
    pub fn select_dataset(&mut self, key: &str) -> Result<Vec<SessionEvent>, DatasetError> {
        let dataset = self.registry.resolve(key)?;
        let mut events = self.reset();
        tracing::info!(dataset = %dataset.key, samples = dataset.samples.len(), "dataset selected");
        events.push(SessionEvent::DatasetSwitched(dataset.key));
        self.dataset = dataset;
        Ok(events)
    }

    /// Adopts a new settings snapshot. Called from [`update`](Self::update)
    /// for snapshots arriving over the subscription.
    pub fn apply_settings(&mut self, next: Arc<Settings>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let prev = std::mem::replace(&mut self.settings, next);

        let requested = self.settings.data_source.parse::<TrialKey>().ok();
        if prev.data_source != self.settings.data_source && requested != Some(self.dataset.key) {
            let key = self.settings.data_source.clone();
            match self.select_dataset(&key) {
                Ok(switched) => events.extend(switched),
                Err(e) => {
                    tracing::error!(key = %key, error = %e, "dataset rejected");
                    events.push(SessionEvent::DatasetRejected {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if self.state.is_running() && prev.audio != self.settings.audio {
            let now = self.timer.now();
            self.schedule_beep(now, &mut events);
        }

        events
    }

    /// Drains pending settings, then runs whichever tasks are due.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(snapshot) = self.subscription.latest() {
            events.extend(self.apply_settings(snapshot));
        }
        if !self.state.is_running() {
            return events;
        }

        let now = self.timer.now();
        if self.poll.as_mut().is_some_and(|task| task.fire_if_due(now)) {
            self.poll_tick(now, &mut events);
        }
        if self.state.is_running() && self.beep.as_mut().is_some_and(|task| task.fire_if_due(now))
        {
            self.fire_beep(&mut events);
        }
        events
    }

    pub fn test_sound(&mut self) -> Result<(), FeedbackError> {
        let sound = self.settings.sound_name();
        tracing::debug!(%sound, volume = self.settings.volume, "test sound");
        self.feedback.preview(sound, self.settings.volume)
    }

    fn poll_tick(&mut self, now: u64, events: &mut Vec<SessionEvent>) {
        let Some(started) = self.started_at else {
            return;
        };
        let elapsed = Duration::from_nanos(now.saturating_sub(started)).as_secs_f64();
        let Some(sample) = locate(&self.dataset.samples, elapsed).copied() else {
            return;
        };

        self.elapsed = elapsed;
        self.current_force = Some(sample.force);
        events.push(SessionEvent::Sample {
            elapsed,
            force: sample.force,
            label: sample.label,
        });

        let tempo = next_tempo(self.tempo, sample.label);
        if tempo != self.tempo {
            self.tempo = tempo;
            tracing::debug!(bpm = tempo.bpm(), "tempo changed");
            events.push(SessionEvent::TempoChanged(tempo));
            if let Some(task) = self.beep.as_mut() {
                task.reschedule(tempo.period(), now);
            }
        }
        if let Some(class) = classify(sample.label) {
            if let Err(e) = self.feedback.vibrate(class.band, &self.settings) {
                Self::feedback_failed(events, e);
            }
            if self.last_alert != Some(class.band) {
                tracing::info!(alert = class.alert_message(), force = sample.force, elapsed, "alert");
                events.push(SessionEvent::Alert(class.band));
            }
            self.last_alert = Some(class.band);
        }

        if elapsed > self.dataset.end_time() {
            self.state = PlaybackState::Idle;
            self.started_at = None;
            self.cancel_tasks(events);
            tracing::info!(dataset = %self.dataset.key, elapsed, "end of trial");
            events.push(SessionEvent::AutoStopped { elapsed });
        }
    }

    fn fire_beep(&mut self, events: &mut Vec<SessionEvent>) {
        let sound = self.settings.sound_name();
        match self.feedback.beep(sound, self.settings.volume) {
            Ok(()) => events.push(SessionEvent::Beep(sound)),
            Err(e) => Self::feedback_failed(events, e),
        }
    }

    fn schedule_tasks(&mut self, now: u64) {
        self.poll = Some(RepeatingTask::new(self.config.poll_interval(), now));
        self.beep = None;
        if self.settings.audio {
            self.beep = Some(RepeatingTask::new(self.tempo.period(), now));
        }
    }

    fn schedule_beep(&mut self, now: u64, events: &mut Vec<SessionEvent>) {
        if self.settings.audio {
            self.beep = Some(RepeatingTask::new(self.tempo.period(), now));
        } else {
            self.beep = None;
            if let Err(e) = self.feedback.silence() {
                Self::feedback_failed(events, e);
            }
        }
    }

    fn cancel_tasks(&mut self, events: &mut Vec<SessionEvent>) {
        self.poll = None;
        self.beep = None;
        if let Err(e) = self.feedback.silence() {
            Self::feedback_failed(events, e);
        }
    }

    fn feedback_failed(events: &mut Vec<SessionEvent>, error: FeedbackError) {
        tracing::warn!(%error, "feedback channel failed");
        events.push(SessionEvent::FeedbackFailed(error));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn current_force(&self) -> Option<f64> {
        self.current_force
    }

    pub fn last_alert(&self) -> Option<Band> {
        self.last_alert
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn poll_scheduled(&self) -> bool {
        self.poll.is_some()
    }

    pub fn beep_scheduled(&self) -> bool {
        self.beep.is_some()
    }

    pub fn beep_period(&self) -> Option<Duration> {
        self.beep.map(|task| task.period())
    }

    pub fn feedback(&self) -> &FeedbackDispatcher<H, P> {
        &self.feedback
    }

    pub fn until_next_task(&self) -> Option<Duration> {
        let now = self.timer.now();
        [self.poll, self.beep]
            .into_iter()
            .flatten()
            .map(|task| task.until_due(now))
            .min()
    }

    pub fn view(&self) -> PlaybackView {
        PlaybackView {
            state: self.state,
            dataset: self.dataset.key,
            elapsed: self.elapsed,
            end_time: self.dataset.end_time(),
            current_force: self.current_force,
            last_alert: self.last_alert,
            tempo: self.tempo,
        }
    }
}
