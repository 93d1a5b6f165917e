use std::collections::HashMap;
use std::sync::Mutex;

use time::OffsetDateTime;
use tracing::{error, info, warn};

use shared::election::{backfill_votes, ElectionStatus, EligibleVoters};
use shared::models::{
    Candidate, CandidateId, ElectionConfig, ElectionData, ResultsResponse, SubmitVoteResponse,
    ValidateVoterResponse, VoteTable,
};
use shared::validation::{normalize_voter_id, parse_config_update};

use crate::error::ApiError;
use crate::persistence::Storage;

#[derive(Debug)]
struct Tables {
    candidates: Vec<Candidate>,
    eligible: EligibleVoters,
    config: ElectionConfig,
    data: ElectionData,
}

/// Owns the four election tables behind one lock. Every operation takes the
/// lock for its whole read-validate-mutate-persist sequence, so no update is
/// lost even though Rocket dispatches handlers from many threads. Persistence
/// goes through the injected [`Storage`]; a failed write is logged and the
/// in-memory state stays authoritative.
pub struct ElectionStore {
    storage: Box<dyn Storage>,
    tables: Mutex<Tables>,
}

impl ElectionStore {
    /// Loads all four tables, substituting documented defaults for missing
    /// or unreadable files. Never fails.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let now = OffsetDateTime::now_utc();

        let candidates = match storage.load_candidates() {
            Ok(Some(list)) => list,
            Ok(None) => {
                warn!("candidates file not found, starting with an empty list");
                Vec::new()
            }
            Err(err) => {
                error!("could not load candidates: {err}");
                Vec::new()
            }
        };

        let eligible = match storage.load_eligible_voters() {
            Ok(Some(ids)) => EligibleVoters::from_list(ids),
            Ok(None) => {
                warn!("voters file not found, starting with an empty roll");
                EligibleVoters::default()
            }
            Err(err) => {
                error!("could not load eligible voters: {err}");
                EligibleVoters::default()
            }
        };

        let config = match storage.load_config() {
            Ok(Some(config)) => config,
            Ok(None) => {
                let config = ElectionConfig::default_window(now);
                warn!("election config not found, writing a default 24h window");
                if let Err(err) = storage.save_config(&config) {
                    error!("could not write default config: {err}");
                }
                config
            }
            Err(err) => {
                error!("could not load election config: {err}");
                ElectionConfig::default_window(now)
            }
        };

        let mut data = match storage.load_data() {
            Ok(Some(data)) => data,
            Ok(None) => ElectionData::default(),
            Err(err) => {
                error!("could not load election data: {err}");
                ElectionData::default()
            }
        };
        backfill_votes(&mut data.votes, &candidates);

        info!(
            candidates = candidates.len(),
            eligible_voters = eligible.len(),
            "election store loaded"
        );

        Self {
            storage,
            tables: Mutex::new(Tables {
                candidates,
                eligible,
                config,
                data,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, ApiError> {
        self.tables
            .lock()
            .map_err(|_| ApiError::Internal("state lock poisoned".into()))
    }

    fn persist_data(&self, data: &ElectionData) {
        if let Err(err) = self.storage.save_data(data) {
            error!("could not persist election data: {err}");
        }
    }

    fn persist_config(&self, config: &ElectionConfig) {
        if let Err(err) = self.storage.save_config(config) {
            error!("could not persist election config: {err}");
        }
    }

    pub fn status_at(&self, now: OffsetDateTime) -> Result<ElectionStatus, ApiError> {
        let tables = self.lock()?;
        Ok(ElectionStatus::at(&tables.config, now))
    }

    pub fn candidates(&self) -> Result<Vec<Candidate>, ApiError> {
        let tables = self.lock()?;
        Ok(tables.candidates.clone())
    }

    pub fn validate_voter(
        &self,
        raw_id: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<ValidateVoterResponse, ApiError> {
        let tables = self.lock()?;
        match ElectionStatus::at(&tables.config, now) {
            ElectionStatus::Pending => return Err(ApiError::NotStarted),
            ElectionStatus::Ended => return Err(ApiError::Ended),
            ElectionStatus::Active => {}
        }
        let voter_id = normalize_voter_id(raw_id.unwrap_or_default());
        if voter_id.is_empty() {
            return Err(ApiError::MissingVoterId);
        }
        if !tables.eligible.contains(&voter_id) {
            return Err(ApiError::IneligibleVoter);
        }
        Ok(ValidateVoterResponse {
            is_eligible: true,
            has_voted: tables.data.voters.get(&voter_id).cloned().unwrap_or_default(),
        })
    }

    pub fn submit_vote(
        &self,
        raw_id: Option<&str>,
        selections: Option<&HashMap<String, Option<CandidateId>>>,
        now: OffsetDateTime,
    ) -> Result<SubmitVoteResponse, ApiError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        match ElectionStatus::at(&tables.config, now) {
            ElectionStatus::Pending => return Err(ApiError::NotStarted),
            ElectionStatus::Ended => return Err(ApiError::Ended),
            ElectionStatus::Active => {}
        }
        let voter_id = normalize_voter_id(raw_id.unwrap_or_default());
        let selections = match selections {
            Some(selections) if !voter_id.is_empty() => selections,
            _ => return Err(ApiError::MissingSubmission),
        };
        if !tables.eligible.contains(&voter_id) {
            return Err(ApiError::UnauthorizedVoter);
        }

        let accepted = tables
            .data
            .record_ballot(&voter_id, selections, &tables.candidates)?;
        info!(voter = %voter_id, positions = accepted.len(), "ballot recorded");
        self.persist_data(&tables.data);

        Ok(SubmitVoteResponse {
            votes: tables.data.votes.clone(),
            has_voted: tables.data.voters.get(&voter_id).cloned().unwrap_or_default(),
        })
    }

    /// Tallies are visible from the moment the window opens, including after
    /// it closes.
    pub fn results(&self, now: OffsetDateTime) -> Result<ResultsResponse, ApiError> {
        let tables = self.lock()?;
        if !ElectionStatus::at(&tables.config, now).has_started() {
            return Err(ApiError::NotStarted);
        }
        Ok(ResultsResponse {
            votes: tables.data.votes.clone(),
        })
    }

    /// Admin: wholesale tally replacement. No reconciliation against the
    /// candidate list or voter records is attempted.
    pub fn overwrite_votes(&self, votes: VoteTable) -> Result<(), ApiError> {
        let mut tables = self.lock()?;
        tables.data.votes = votes;
        info!("vote tallies overwritten by admin");
        self.persist_data(&tables.data);
        Ok(())
    }

    /// Admin: replace the voting window. The previous config survives any
    /// validation failure. Moving the boundaries never touches already-cast
    /// votes.
    pub fn update_config(&self, start: &str, end: &str) -> Result<(), ApiError> {
        let config = parse_config_update(start, end).map_err(|err| {
            warn!("rejected config update: {err}");
            ApiError::InvalidWindow
        })?;
        let mut tables = self.lock()?;
        tables.config = config;
        info!(start = %start, end = %end, "election window updated");
        self.persist_config(&tables.config);
        Ok(())
    }

    /// Admin: new cycle. Tallies reseeded to zero, voter records cleared,
    /// candidates and eligibility untouched.
    pub fn reset(&self) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        tables.data.reset(&tables.candidates);
        info!("election data reset");
        self.persist_data(&tables.data);
        Ok(())
    }
}
