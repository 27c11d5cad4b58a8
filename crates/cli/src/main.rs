use std::path::PathBuf;
use std::process;

use clap::Parser;

use facelog_core::config::Config;
use facelog_core::detect::{CascadeDetector, DetectorParams};
use facelog_core::pipeline::ProcessVideoUseCase;
use facelog_core::video::{OpenCvSink, OpenCvSource, VideoSink, VideoSource};
use facelog_core::writer::write_json;

/// Detect faces in a video and log them per frame.
#[derive(Parser)]
#[command(name = "facelog")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "conf.yaml")]
    config: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let detector = CascadeDetector::open(
        &config.paths.inputs.model_path,
        DetectorParams::from_model(&config.model),
    )?;

    let mut source = OpenCvSource::open(&config.paths.inputs.video_path)?;
    let sink: Option<Box<dyn VideoSink>> = if config.process.if_save_video {
        match OpenCvSink::create(&config.paths.outputs.video_path, &source.probe()) {
            Ok(sink) => Some(Box::new(sink)),
            Err(e) => {
                // The input was already acquired; let it go before
                // surfacing the fatal error.
                source.release();
                return Err(e.into());
            }
        }
    } else {
        None
    };

    let use_case = ProcessVideoUseCase::new(
        Box::new(source),
        sink,
        Box::new(detector),
        config.model.max_size,
    );
    let log = use_case.execute()?;

    if config.process.is_save_json {
        write_json(&log, &config.paths.outputs.json_path)?;
        log::info!(
            "face log for {} frame(s) written to {}",
            log.len(),
            config.paths.outputs.json_path.display()
        );
    }

    log::info!("--- DONE ---");
    Ok(())
}
