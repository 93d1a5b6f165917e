use std::collections::{HashMap, HashSet};
use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::models::{Candidate, CandidateId, ElectionConfig, ElectionData, VoteTable};
use crate::validation::normalize_voter_id;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("No valid votes to record")]
    NoValidVotes,
}

/// Where the current moment falls relative to the voting window. Recomputed
/// from the clock on every request; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    Pending,
    Active,
    Ended,
}

impl ElectionStatus {
    /// Both window boundaries count as active.
    pub fn at(config: &ElectionConfig, now: OffsetDateTime) -> Self {
        if now < config.start_time {
            ElectionStatus::Pending
        } else if now > config.end_time {
            ElectionStatus::Ended
        } else {
            ElectionStatus::Active
        }
    }

    pub fn is_active(self) -> bool {
        self == ElectionStatus::Active
    }

    pub fn has_started(self) -> bool {
        self != ElectionStatus::Pending
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElectionStatus::Pending => write!(f, "pending"),
            ElectionStatus::Active => write!(f, "active"),
            ElectionStatus::Ended => write!(f, "ended"),
        }
    }
}

/// The eligibility roll, held as normalized IDs so lookups are
/// case-insensitive and whitespace-tolerant.
#[derive(Debug, Clone, Default)]
pub struct EligibleVoters {
    ids: HashSet<String>,
}

impl EligibleVoters {
    pub fn from_list<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = raw
            .into_iter()
            .map(|id| normalize_voter_id(id.as_ref()))
            .filter(|id| !id.is_empty())
            .collect();
        Self { ids }
    }

    /// Expects an already-normalized ID.
    pub fn contains(&self, voter_id: &str) -> bool {
        self.ids.contains(voter_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Zero-filled tally table with one entry per (position, candidate) pair.
pub fn seed_votes(candidates: &[Candidate]) -> VoteTable {
    let mut votes = VoteTable::new();
    for candidate in candidates {
        votes
            .entry(candidate.position.clone())
            .or_default()
            .insert(candidate.id, 0);
    }
    votes
}

/// Merges any (position, candidate) pair missing from a previously persisted
/// table. Existing counts are kept untouched.
pub fn backfill_votes(votes: &mut VoteTable, candidates: &[Candidate]) {
    for candidate in candidates {
        votes
            .entry(candidate.position.clone())
            .or_default()
            .entry(candidate.id)
            .or_insert(0);
    }
}

impl ElectionData {
    /// Records a ballot for an already-authorized voter. Each submitted
    /// position is accepted only if a candidate was actually selected, the
    /// voter has not voted that position before, and the selection names a
    /// real candidate for that position. Failing positions are skipped
    /// without error; the ballot as a whole fails only when nothing was
    /// accepted. Returns the positions that were recorded.
    pub fn record_ballot(
        &mut self,
        voter_id: &str,
        selections: &HashMap<String, Option<CandidateId>>,
        candidates: &[Candidate],
    ) -> Result<Vec<String>, BallotError> {
        let mut accepted = Vec::new();
        for (position, choice) in selections {
            let Some(candidate_id) = *choice else {
                continue;
            };
            let already_voted = self
                .voters
                .get(voter_id)
                .and_then(|record| record.get(position))
                .copied()
                .unwrap_or(false);
            if already_voted {
                continue;
            }
            let is_real = candidates
                .iter()
                .any(|c| c.position == *position && c.id == candidate_id);
            if !is_real {
                continue;
            }
            *self
                .votes
                .entry(position.clone())
                .or_default()
                .entry(candidate_id)
                .or_insert(0) += 1;
            self.voters
                .entry(voter_id.to_owned())
                .or_default()
                .insert(position.clone(), true);
            accepted.push(position.clone());
        }
        if accepted.is_empty() {
            return Err(BallotError::NoValidVotes);
        }
        Ok(accepted)
    }

    /// Starts a fresh cycle: every tally back to zero, every voter record
    /// gone. Candidates and eligibility are not touched.
    pub fn reset(&mut self, candidates: &[Candidate]) {
        self.votes = seed_votes(candidates);
        self.voters.clear();
    }
}
