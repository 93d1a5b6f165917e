use std::path::{Path, PathBuf};

use rocket::figment::Figment;
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. Lives inside the managed `AppState` so any
/// endpoint can inspect it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    data_dir: PathBuf,
    admin_secret: String,
    frontend_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            admin_secret: "admin123".into(),
            frontend_origin: "http://localhost:3000".into(),
        }
    }
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Self {
        match figment.extract() {
            Ok(config) => config,
            Err(err) => {
                warn!("could not read app config, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Directory holding the four JSON documents.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Origin allowed by the CORS fairing.
    pub fn frontend_origin(&self) -> &str {
        &self.frontend_origin
    }

    /// All-or-nothing gate for the admin operations: the supplied secret
    /// must match exactly.
    pub fn check_admin_secret(&self, supplied: &str) -> Result<(), ApiError> {
        if supplied == self.admin_secret {
            Ok(())
        } else {
            Err(ApiError::InvalidSecret)
        }
    }
}
