pub mod catchers;
pub mod config;
pub mod cors;
pub mod error;
pub mod persistence;
pub mod routes;
pub mod store;

use rocket::{routes, catchers, Build, Rocket};

use crate::catchers::{bad_request, forbidden, internal_error, not_found};
use crate::cors::Cors;
use crate::routes::{
    all_options, election_status, get_results, health, list_candidates, reset_election,
    submit_vote, update_config, update_votes, validate_voter, AppState,
};

/// Assembles the server around an already-loaded state. Split out of `main`
/// so tests can mount the same routes against their own storage.
pub fn server(state: AppState) -> Rocket<Build> {
    let cors = Cors::new(state.config.frontend_origin());
    rocket::build()
        .attach(cors)
        .manage(state)
        .mount(
            "/api",
            routes![
                election_status,
                list_candidates,
                validate_voter,
                submit_vote,
                get_results,
                update_votes,
                update_config,
                reset_election,
                all_options
            ],
        )
        .mount("/", routes![health])
        .register(
            "/",
            catchers![bad_request, forbidden, not_found, internal_error],
        )
}
