use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;

/// Opens the connection pool from DATABASE_URL. SQL statement logging is
/// routed through `log` at debug level so it follows RUST_LOG.
pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in .env file");

    let mut options = ConnectOptions::new(database_url);
    options
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    Database::connect(options).await
}
