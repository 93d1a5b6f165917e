use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use time::OffsetDateTime;

use crate::election::ElectionStatus;

pub type CandidateId = u32;

/// Tally table: position name -> candidate id -> running count.
pub type VoteTable = HashMap<String, HashMap<CandidateId, u64>>;

/// Per-voter map of positions already voted.
pub type VoterRecord = HashMap<String, bool>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: String,
}

/// The voting window. Invariant: `start_time < end_time`, enforced on every
/// admin update; a loaded file is trusted as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElectionConfig {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

impl ElectionConfig {
    /// Fallback window used when no config file exists: opens immediately
    /// and runs for 24 hours.
    pub fn default_window(now: OffsetDateTime) -> Self {
        Self {
            start_time: now,
            end_time: now + time::Duration::hours(24),
        }
    }
}

/// Everything that mutates during an election cycle: the tallies and the
/// per-voter records guarding against duplicate votes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElectionData {
    #[serde(default)]
    pub votes: VoteTable,
    #[serde(default)]
    pub voters: HashMap<String, VoterRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: ElectionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateVoterRequest {
    #[serde(default)]
    pub voter_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateVoterResponse {
    pub is_eligible: bool,
    pub has_voted: VoterRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteRequest {
    #[serde(default)]
    pub voter_id: Option<String>,
    /// Position -> selected candidate. `None` means the position was left
    /// blank on the ballot and is skipped.
    #[serde(default)]
    pub selected_candidates: Option<HashMap<String, Option<CandidateId>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteResponse {
    pub votes: VoteTable,
    pub has_voted: VoterRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub votes: VoteTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVotesRequest {
    #[serde(default)]
    pub votes: Option<VoteTable>,
    #[serde(default)]
    pub admin_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub admin_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(default)]
    pub admin_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminAck {
    pub success: bool,
}

impl AdminAck {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
