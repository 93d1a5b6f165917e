use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use shared::models::{Candidate, ElectionConfig, ElectionData};

pub const CANDIDATES_FILE: &str = "candidates.json";
pub const VOTERS_FILE: &str = "voters.json";
pub const CONFIG_FILE: &str = "election_config.json";
pub const DATA_FILE: &str = "election_data.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable backing for the four election tables. `load_*` returns `Ok(None)`
/// when no document exists yet; the store decides what default to substitute.
/// Candidates and the eligibility roll are read-only reference data, so only
/// the config and the election data get save methods.
pub trait Storage: Send + Sync {
    fn load_candidates(&self) -> Result<Option<Vec<Candidate>>, StorageError>;
    fn load_eligible_voters(&self) -> Result<Option<Vec<String>>, StorageError>;
    fn load_config(&self) -> Result<Option<ElectionConfig>, StorageError>;
    fn load_data(&self) -> Result<Option<ElectionData>, StorageError>;
    fn save_config(&self, config: &ElectionConfig) -> Result<(), StorageError>;
    fn save_data(&self, data: &ElectionData) -> Result<(), StorageError>;
}

/// One pretty-printed JSON document per table, rewritten in full on every
/// save, under a single data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let path = self.dir.join(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Parse { path, source })
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(name);
        if let Err(source) = fs::create_dir_all(&self.dir) {
            return Err(StorageError::Write { path, source });
        }
        let raw = serde_json::to_string_pretty(value)
            .map_err(|source| StorageError::Encode { path: path.clone(), source })?;
        fs::write(&path, raw).map_err(|source| StorageError::Write { path, source })
    }
}

impl Storage for JsonFileStorage {
    fn load_candidates(&self) -> Result<Option<Vec<Candidate>>, StorageError> {
        self.read(CANDIDATES_FILE)
    }

    fn load_eligible_voters(&self) -> Result<Option<Vec<String>>, StorageError> {
        self.read(VOTERS_FILE)
    }

    fn load_config(&self) -> Result<Option<ElectionConfig>, StorageError> {
        self.read(CONFIG_FILE)
    }

    fn load_data(&self) -> Result<Option<ElectionData>, StorageError> {
        self.read(DATA_FILE)
    }

    fn save_config(&self, config: &ElectionConfig) -> Result<(), StorageError> {
        self.write(CONFIG_FILE, config)
    }

    fn save_data(&self, data: &ElectionData) -> Result<(), StorageError> {
        self.write(DATA_FILE, data)
    }
}
