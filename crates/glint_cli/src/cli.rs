use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Offline Whitted ray tracer")]
pub struct Args {
    /// Scene description (JSON). Renders the built-in demo scene when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Output image path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Image width in pixels, overriding the scene
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels, overriding the scene
    #[arg(long)]
    pub height: Option<u32>,

    /// Render on a single thread for reproducible output
    #[arg(long)]
    pub debug: bool,

    /// Number of worker threads (defaults to all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Edge of the per-pixel sample grid (2 gives 2x2 supersampling)
    #[arg(long, default_value_t = 2)]
    pub supersample: u32,

    /// Maximum recursion depth, overriding the scene
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
