use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "whitted")]
#[command(about = "An interactive Whitted-style ray tracer")]
#[command(
    long_about = "An interactive Whitted-style ray tracer.\n\n\
    The window only takes input: R or Space renders a frame, S saves it as a PNG \
    to the output path and the title bar shows the last render time. Frames are \
    not drawn inside the window."
)]
pub struct Args {
    /// Scene and renderer configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to save rendered images, overrides the config
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Render a single frame to the output file and exit
    #[arg(long)]
    pub headless: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
