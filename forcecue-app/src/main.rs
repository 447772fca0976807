mod app;
mod cli;
mod config;
mod controls;
mod feedback;
mod headless;
mod tone;

use anyhow::{Context, Result};
use clap::Parser;
use forcecue_playback::{DatasetRegistry, PlaybackSession, SettingsStore, TrialKey};
use forcecue_timing::HighPrecisionTimer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::feedback::{AppPlayer, TracingHaptics};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli)?;

    let registry = DatasetRegistry::load_dir(&config.data_dir)
        .with_context(|| format!("loading trials from {}", config.data_dir.display()))?;
    if registry.is_empty() {
        tracing::warn!(dir = %config.data_dir.display(), "no trial files found");
    }

    if cli.list {
        list_trials(&registry);
        return Ok(());
    }

    let registry = Arc::new(registry);
    if cli.headless {
        return run_headless(config, registry);
    }
    App::new(config, registry)?.run()
}

fn list_trials(registry: &DatasetRegistry) {
    for key in TrialKey::ALL {
        match registry.get(key) {
            Ok(trial) => println!(
                "{}  {:<18}  {:>6} samples  {:>7.2}s  peak {:.4} N",
                key.index() + 1,
                key.as_str(),
                trial.samples.len(),
                trial.end_time(),
                trial.peak_force()
            ),
            Err(e) => println!("{}  {:<18}  unavailable: {}", key.index() + 1, key.as_str(), e),
        }
    }
}

fn run_headless(config: AppConfig, registry: Arc<DatasetRegistry>) -> Result<()> {
    let mut store = SettingsStore::new(config.settings.clone());
    let timer = HighPrecisionTimer::new();
    let mut session = PlaybackSession::new(
        config.playback.clone(),
        registry,
        store.subscribe(),
        timer.clone(),
        TracingHaptics::default(),
        AppPlayer::detect(),
    )?;
    let summary = headless::replay(&mut session, &timer, config.playback.poll_interval());
    println!(
        "{}: {} samples over {:.2}s, peak {:.4} N, {} alerts, {} beeps",
        session.dataset().key,
        summary.samples,
        summary.elapsed,
        summary.peak_force,
        summary.alerts.len(),
        summary.beeps
    );
    Ok(())
}
