use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use thiserror::Error;

use shared::election::BallotError;
use shared::error::ErrorResponse;

/// Every way a request can be refused. Display strings are the wire-visible
/// `error` field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Election has not started yet.")]
    NotStarted,
    #[error("Election has ended.")]
    Ended,
    #[error("Voter ID is required")]
    MissingVoterId,
    #[error("Invalid voter ID")]
    IneligibleVoter,
    #[error("Voter ID and selections required")]
    MissingSubmission,
    #[error("Unauthorized voter")]
    UnauthorizedVoter,
    #[error("No valid votes to record")]
    NoValidVotes,
    #[error("Invalid admin password")]
    InvalidSecret,
    #[error("Votes data required")]
    MissingVotes,
    #[error("Start and end times required")]
    MissingWindow,
    #[error("Invalid start or end time")]
    InvalidWindow,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::NotStarted
            | ApiError::Ended
            | ApiError::IneligibleVoter
            | ApiError::UnauthorizedVoter
            | ApiError::InvalidSecret => Status::Forbidden,
            ApiError::MissingVoterId
            | ApiError::MissingSubmission
            | ApiError::NoValidVotes
            | ApiError::MissingVotes
            | ApiError::MissingWindow
            | ApiError::InvalidWindow => Status::BadRequest,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl From<BallotError> for ApiError {
    fn from(err: BallotError) -> Self {
        match err {
            BallotError::NoValidVotes => ApiError::NoValidVotes,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.to_string()));
        rocket::Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}
