use std::io::Write;
use chrono::Local;
use log::LevelFilter;
use crate::config::subsystems::LoggingConfig;
use crate::error::Result;

/// Installs the global `env_logger` backend.
///
/// Lines are timestamped. When `config.log_dir` is set they are appended to
/// `cluster_units_<timestamp>.log` inside it, otherwise they go to stderr. `level`
/// overrides the configured level.
pub fn init_logging(config: &LoggingConfig, level: Option<LevelFilter>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level.unwrap_or_else(|| config.get_log_level()));

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("cluster_units_{}.log", timestamp)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    // A second initialisation (tests, embedding applications) keeps the first logger.
    let _ = builder.try_init();
    Ok(())
}
