mod announcements;

#[cfg(test)]
pub(crate) mod test;

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use sqlx::{Pool, Sqlite};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteQueryResult};

pub use announcements::*;
use crate::config::DatabaseConfig;

#[derive(Clone)]
pub struct Repositories {
    pub announcements: Announcements,
}

impl Repositories {
    pub fn new(db_conn: &Pool<Sqlite>) -> Self {
        Self {
            announcements: Announcements::new(db_conn.clone()),
        }
    }
}

pub async fn establish_database_connection(config: &DatabaseConfig) -> Result<Pool<Sqlite>, anyhow::Error> {
    let options = SqliteConnectOptions::from_str(config.url.as_str())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options).await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

#[macro_export]
macro_rules! repository {
    ($name:ident, $($methods:item),*) => {
        #[derive(Clone)]
        pub struct $name {
            pool: sqlx::Pool<sqlx::Sqlite>,
        }

        impl $name {
            pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
                Self { pool }
            }

            $($methods)*
        }
    };
}

fn ensure_only_one_row_updated(res: SqliteQueryResult) -> Result<SqliteQueryResult, anyhow::Error> {
    match res.rows_affected() {
        1 => Ok(res),
        x => Err(anyhow!("not only one row was updated but {x}"))
    }
}
