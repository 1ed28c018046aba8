mod config;
mod domain;
mod handlers;
mod metrics;
mod repo;
mod scheduler;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::handlers::AppState;
use crate::scheduler::{LogDeliverySink, Scheduler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv()?;

    pretty_env_logger::init();

    let app_config = config::AppConfig::from_env();
    let database_config = config::DatabaseConfig::from_env()?;
    let db_conn = repo::establish_database_connection(&database_config).await?;
    let repos = repo::Repositories::new(&db_conn);

    let scheduler = Scheduler::new(repos.announcements.clone(), app_config.roster.clone(), Arc::new(LogDeliverySink));
    let rearmed = scheduler.rearm_pending().await?;
    if rearmed > 0 {
        log::info!("re-armed {rearmed} unsent announcements");
    }

    let state = AppState { scheduler, repos };
    let app = axum::Router::new()
        .merge(handlers::router(state))
        .merge(metrics::init());

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.server_port));
    log::info!("listening on {addr} with a roster of {} recipients", app_config.roster.len());
    let tcp_listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(tcp_listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C signal handler");
            log::info!("shutdown of the announcement server")
        })
        .await
        .map_err(Into::into)
}
