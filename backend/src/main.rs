use backend::config::AppConfig;
use backend::persistence::JsonFileStorage;
use backend::routes::AppState;
use backend::store::ElectionStore;
use rocket::launch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[launch]
fn rocket() -> _ {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let figment = rocket::Config::figment();
    let config = AppConfig::from_figment(&figment);
    let storage = JsonFileStorage::new(config.data_dir());
    let store = ElectionStore::open(Box::new(storage));
    info!(data_dir = %config.data_dir().display(), "starting election backend");

    backend::server(AppState::new(store, config))
}
