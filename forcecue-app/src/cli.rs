use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "forcecue",
    version,
    about = "Replay recorded force-sensor trials with threshold feedback"
)]
pub struct Cli {
    /// TOML config file (defaults to ./forcecue.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the trial JSON files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Trial to start with, e.g. Surgeon_1_Trial_2
    #[arg(long, value_name = "KEY")]
    pub dataset: Option<String>,

    /// Start with the audio metronome enabled
    #[arg(long)]
    pub audio: bool,

    /// Start with vibration disabled
    #[arg(long)]
    pub no_vibration: bool,

    /// Metronome sound: Scan, Loud Beep, Electronic or GTA
    #[arg(long, value_name = "NAME")]
    pub sound: Option<String>,

    /// Metronome volume between 0 and 1
    #[arg(long, value_name = "LEVEL")]
    pub volume: Option<f32>,

    /// Replay in the terminal without opening a window
    #[arg(long)]
    pub headless: bool,

    /// List the trials found in the data directory and exit
    #[arg(long)]
    pub list: bool,
}
