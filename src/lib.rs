pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod events;
pub mod models;
pub mod persistence;
pub mod repositories;
pub mod routes;
pub mod services;

use std::sync::Arc;

use crate::events::dispatcher::TracingEventDispatcher;
use crate::repositories::vacancy_repository::PgVacancyRepository;
use crate::services::vacancy_service::VacancyService;
use sqlx::PgPool;

/// Composition root. All dependencies are constructed eagerly here; nothing
/// is lazily initialized or stashed in process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub vacancy_service: VacancyService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let repository = Arc::new(PgVacancyRepository::new(pool.clone()));
        let dispatcher = Arc::new(TracingEventDispatcher::new());
        let vacancy_service = VacancyService::new(repository, dispatcher);

        Self {
            pool,
            vacancy_service,
        }
    }
}
