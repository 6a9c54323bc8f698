use std::{fs::File, str::FromStr, sync::Arc};

use tracing_subscriber::{
    filter::{self, LevelFilter},
    fmt::writer::BoxMakeWriter,
    prelude::*,
};
use velox::dir::VeloxDirectory;

const GUI_LOG_FILE_NAME: &str = "velox-gui.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Creating log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid LOG_LEVEL: {0}")]
    Level(String),
    #[error("Installing logger: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

pub fn setup_logger(log_level: LevelFilter, datadir: &VeloxDirectory) -> Result<(), LoggerError> {
    let file = File::create(datadir.file(GUI_LOG_FILE_NAME))?;
    let writer = BoxMakeWriter::new(Arc::new(file));

    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(false);

    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_file(false);

    tracing_subscriber::registry()
        .with(
            stdout_log
                .and_then(file_log)
                .with_filter(log_level)
                .with_filter(filter::filter_fn(|metadata| {
                    !is_noisy_target(metadata.target())
                })),
        )
        .try_init()?;

    Ok(())
}

fn is_noisy_target(target: &str) -> bool {
    [
        "iced_wgpu",
        "iced_winit",
        "iced_graphics",
        "iced_runtime",
        "iced_core",
        "wgpu_core",
        "wgpu_hal",
        "naga",
        "winit",
        "cosmic_text",
        "calloop",
        "polling",
        "mio",
        "rustls",
        "hyper",
        "reqwest",
        "tokio",
    ]
    .iter()
    .any(|prefix| target.starts_with(prefix))
}

/// Parse LOG_LEVEL environment variable.
pub fn parse_log_level() -> Result<Option<LevelFilter>, LoggerError> {
    if let Ok(l) = std::env::var("LOG_LEVEL") {
        LevelFilter::from_str(&l)
            .map(Some)
            .map_err(|e| LoggerError::Level(e.to_string()))
    } else {
        Ok(None)
    }
}
