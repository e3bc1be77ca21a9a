//! Process bootstrap for the `pageview` binary: file logging, then settings

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::settings::Settings;

/// Level in effect while the settings file is read
const BOOTSTRAP_LEVEL: LevelFilter = LevelFilter::Info;

/// Start logging to `log_file`, then load settings.
///
/// The logger is installed first so that settings diagnostics (parse
/// failures, migration, a freshly created file) end up in the log. Once the
/// settings are known the global level switches to `cli_level`, or to the
/// level from the settings file when no override was given.
pub fn init_logging_and_settings(
    log_file: &Path,
    cli_level: Option<LevelFilter>,
    config: Option<&Path>,
) -> Result<Settings> {
    let file = File::create(log_file)
        .with_context(|| format!("cannot create log file {}", log_file.display()))?;
    // the writer accepts everything; `log::max_level` does the filtering
    WriteLogger::init(LevelFilter::Trace, Config::default(), file)?;
    log::set_max_level(cli_level.unwrap_or(BOOTSTRAP_LEVEL));
    info!("Starting pageview");

    let settings = Settings::load(config);
    let level = cli_level.unwrap_or_else(|| settings.log_level_filter());
    log::set_max_level(level);
    info!("Log level {level}");
    Ok(settings)
}
