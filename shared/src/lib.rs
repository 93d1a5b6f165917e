pub mod election;
pub mod error;
pub mod models;
pub mod validation;

pub use election::{seed_votes, BallotError, ElectionStatus, EligibleVoters};
pub use error::ErrorResponse;
pub use models::*;
pub use validation::*;

#[cfg(test)]
mod tests;
