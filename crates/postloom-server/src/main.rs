mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(postloom_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = postloom_db::PoolConfig::from_app_config(&config);
    let pool = postloom_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = postloom_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }

    let chat = Arc::new(postloom_llm::ChatClient::new(
        &config.llm_api_base,
        config.llm_api_key.as_deref(),
        config.llm_timeout_secs,
    )?);
    let generation = Arc::new(postloom_pipeline::GenerationConfig::from_app_config(
        &config,
    ));
    let publisher: Arc<dyn postloom_publisher::Publisher> =
        Arc::new(postloom_publisher::SimulatedPublisher::new());

    let _scheduler =
        scheduler::build_scheduler(pool.clone(), &config, Arc::clone(&publisher)).await?;

    let auth = AuthState::from_env(matches!(
        config.env,
        postloom_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            pool,
            chat,
            generation,
            publisher,
            publish_batch_size: config.publish_batch_size,
        },
        auth,
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
