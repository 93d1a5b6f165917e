use rocket::{State, get, post, http::Status, serde::json::Json};
use time::OffsetDateTime;
use tracing::instrument;

use shared::models::{
    AdminAck, Candidate, ResetRequest, ResultsResponse, StatusResponse, SubmitVoteRequest,
    SubmitVoteResponse, UpdateConfigRequest, UpdateVotesRequest, ValidateVoterRequest,
    ValidateVoterResponse,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::store::ElectionStore;

pub struct AppState {
    pub store: ElectionStore,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: ElectionStore, config: AppConfig) -> Self {
        Self { store, config }
    }
}

#[get("/")]
pub async fn health() -> &'static str {
    "Election backend is running"
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

#[get("/election-status")]
pub async fn election_status(state: &State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.store.status_at(OffsetDateTime::now_utc())?;
    Ok(Json(StatusResponse { status }))
}

#[get("/candidates")]
pub async fn list_candidates(state: &State<AppState>) -> Result<Json<Vec<Candidate>>, ApiError> {
    state.store.candidates().map(Json)
}

#[post("/validate-voter", format = "json", data = "<request>")]
pub async fn validate_voter(
    state: &State<AppState>,
    request: Json<ValidateVoterRequest>,
) -> Result<Json<ValidateVoterResponse>, ApiError> {
    let request = request.into_inner();
    state
        .store
        .validate_voter(request.voter_id.as_deref(), OffsetDateTime::now_utc())
        .map(Json)
}

#[instrument(skip(state, request))]
#[post("/submit-vote", format = "json", data = "<request>")]
pub async fn submit_vote(
    state: &State<AppState>,
    request: Json<SubmitVoteRequest>,
) -> Result<Json<SubmitVoteResponse>, ApiError> {
    let request = request.into_inner();
    state
        .store
        .submit_vote(
            request.voter_id.as_deref(),
            request.selected_candidates.as_ref(),
            OffsetDateTime::now_utc(),
        )
        .map(Json)
}

#[get("/results")]
pub async fn get_results(state: &State<AppState>) -> Result<Json<ResultsResponse>, ApiError> {
    state.store.results(OffsetDateTime::now_utc()).map(Json)
}

#[instrument(skip(state, request))]
#[post("/update-votes", format = "json", data = "<request>")]
pub async fn update_votes(
    state: &State<AppState>,
    request: Json<UpdateVotesRequest>,
) -> Result<Json<AdminAck>, ApiError> {
    let request = request.into_inner();
    state.config.check_admin_secret(&request.admin_password)?;
    let votes = request.votes.ok_or(ApiError::MissingVotes)?;
    state.store.overwrite_votes(votes)?;
    Ok(Json(AdminAck::ok()))
}

#[instrument(skip(state, request))]
#[post("/update-config", format = "json", data = "<request>")]
pub async fn update_config(
    state: &State<AppState>,
    request: Json<UpdateConfigRequest>,
) -> Result<Json<AdminAck>, ApiError> {
    let request = request.into_inner();
    state.config.check_admin_secret(&request.admin_password)?;
    let (start, end) = match (&request.start_time, &request.end_time) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ApiError::MissingWindow),
    };
    state.store.update_config(start, end)?;
    Ok(Json(AdminAck::ok()))
}

#[instrument(skip(state, request))]
#[post("/reset", format = "json", data = "<request>")]
pub async fn reset_election(
    state: &State<AppState>,
    request: Json<ResetRequest>,
) -> Result<Json<AdminAck>, ApiError> {
    let request = request.into_inner();
    state.config.check_admin_secret(&request.admin_password)?;
    state.store.reset()?;
    Ok(Json(AdminAck::ok()))
}
