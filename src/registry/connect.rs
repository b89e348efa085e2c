use std::sync::Arc;
use tokio_postgres::Client;

/// Get a database connection, run migrations, and return the client.
pub async fn connect(db_url: &str) -> Arc<Client> {
    log::info!("connecting to registry database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(db_url, tls)
        .await
        .expect("registry database connection failed");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("registry connection error: {e}");
        }
    });
    client
        .batch_execute(super::schema::CREATES)
        .await
        .expect("create experiments table");
    Arc::new(client)
}
