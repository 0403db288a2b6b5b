//! Runtime configuration, read from `config.toml` and the environment.

use crate::error::Result;
use config::Config;
use serde::Deserialize;
use std::env;

/// The `[attendance_manager]` section of the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// A `tracing_subscriber::EnvFilter` directive, e.g. `info` or `course_attendance=debug`.
    pub log_filter: String,
}

impl Settings {
    /// Loads settings, in increasing order of precedence, from `DATABASE_URL` (also read from a
    /// `.env` file), an optional `config.toml`, and `ATTENDANCE__ATTENDANCE_MANAGER__*` variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder().set_default("attendance_manager.log_filter", "info")?;
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_default("attendance_manager.database_url", database_url)?;
        }

        let settings = builder
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ATTENDANCE").separator("__"))
            .build()?;

        Ok(settings.get::<Settings>("attendance_manager")?)
    }
}
