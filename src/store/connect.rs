use redis::aio::ConnectionManager;

/// Connect to the State Store and return a pooled, auto-reconnecting,
/// thread-safe connection handle. Mirrors this codebase's `DB_URL`-from-env
/// connection convention.
pub async fn connect(store_url: &str) -> ConnectionManager {
    log::info!("connecting to state store");
    let client = redis::Client::open(store_url).expect("invalid STORE_URL");
    client
        .get_connection_manager()
        .await
        .expect("state store connection failed")
}
