use std::sync::Arc;

use goalpost_core::badges::{BadgeEngine, BadgeRepositoryTrait};
use goalpost_core::goals::{GoalRepositoryTrait, GoalService, GoalServiceTrait};
use goalpost_core::quotes::QuoteRepositoryTrait;
use goalpost_core::users::{UserRepositoryTrait, UserService, UserServiceTrait};
use goalpost_storage_sqlite::{
    BadgeRepository, GoalRepository, QuoteRepository, SeedOptions, Storage, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub storage: Storage,
    pub user_repository: Arc<dyn UserRepositoryTrait>,
    pub badge_repository: Arc<dyn BadgeRepositoryTrait>,
    pub quote_repository: Arc<dyn QuoteRepositoryTrait>,
    pub badge_engine: Arc<BadgeEngine>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries command output.
    match log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Opens storage and wires repositories and services. Must run inside a Tokio runtime.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let storage = Storage::open(
        &config.db_path,
        &SeedOptions {
            sample_data: config.sample_data,
        },
    )?;
    tracing::info!("Database path in use: {}", storage.db_path());

    let pool = storage.pool();
    let writer = storage.writer();

    let user_repository: Arc<dyn UserRepositoryTrait> =
        Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let goal_repository: Arc<dyn GoalRepositoryTrait> =
        Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let badge_repository: Arc<dyn BadgeRepositoryTrait> =
        Arc::new(BadgeRepository::new(pool.clone(), writer.clone()));
    let quote_repository: Arc<dyn QuoteRepositoryTrait> =
        Arc::new(QuoteRepository::new(pool, writer));

    let badge_engine = Arc::new(BadgeEngine::new(
        goal_repository.clone(),
        badge_repository.clone(),
    ));
    let user_service: Arc<dyn UserServiceTrait> =
        Arc::new(UserService::new(user_repository.clone()));
    let goal_service: Arc<dyn GoalServiceTrait> =
        Arc::new(GoalService::new(goal_repository, badge_engine.clone()));

    Ok(Arc::new(AppState {
        storage,
        user_repository,
        badge_repository,
        quote_repository,
        badge_engine,
        user_service,
        goal_service,
    }))
}
