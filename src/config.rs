use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::infrastructure::feeds::fpl::DEFAULT_FPL_URL;

/// Runtime settings, read from `SQUADREC_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub solver_timeout: Duration,
    /// Cap the simulator checks resulting squads against.
    pub season_budget: f64,
    pub fpl_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./squadrec.db".into(),
            port: 8000,
            solver_timeout: Duration::from_millis(5000),
            season_budget: 100.0,
            fpl_url: DEFAULT_FPL_URL.into(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            db_path: try_load("SQUADREC_DB", defaults.db_path),
            port: try_load("SQUADREC_PORT", defaults.port),
            solver_timeout: Duration::from_millis(try_load(
                "SQUADREC_SOLVER_TIMEOUT_MS",
                defaults.solver_timeout.as_millis() as u64,
            )),
            season_budget: try_load("SQUADREC_SEASON_BUDGET", defaults.season_budget),
            fpl_url: try_load("SQUADREC_FPL_URL", defaults.fpl_url),
        }
    }

    /// Same settings against a different database file.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
