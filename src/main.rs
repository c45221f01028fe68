//! Focus tracker: replays a landmark recording through a tracking session.

use anyhow::{Context, Result};
use clap::Parser;
use focus_tracker::{
    app::TrackerApp,
    config::{Config, EXAMPLE_CONFIG},
    source::ReplaySource,
};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines landmark recording to replay
    #[arg(short, long, required_unless_present = "print_example_config")]
    recording: Option<PathBuf>,

    /// Session length in seconds
    #[arg(short = 't', long, default_value = "60")]
    duration: f64,

    /// Restart the recording when it runs out
    #[arg(long = "loop")]
    repeat: bool,

    /// Tag the session (repeatable, e.g. --tag pomodoro)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path}");
            match Config::from_file(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {e}. Using defaults.");
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };
    config.validate()?;

    let recording = args.recording.context("--recording is required")?;
    let duration = Duration::try_from_secs_f64(args.duration).context("invalid --duration")?;

    let source = ReplaySource::from_file(&recording).looped(args.repeat);
    let mut app = TrackerApp::spawn(source, &config);

    let session = app.run_session(duration, &args.tags).await?;
    if let Some(error) = app.control().last_error() {
        warn!("Capture reported: {error}");
    }
    app.shutdown().await?;

    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}
