mod announcements;

use sqlx::{Pool, Sqlite};

use crate::config::DatabaseConfig;
use crate::repo;

pub async fn start_sqlite() -> Pool<Sqlite> {
    let conf = DatabaseConfig {
        url: "sqlite::memory:".parse().expect("invalid database URL"),
        // a single connection keeps the in-memory database alive and shared
        max_connections: 1,
    };
    repo::establish_database_connection(&conf)
        .await.expect("couldn't establish a database connection")
}
