use std::sync::Arc;

use crate::error::{Error, Result};
use crate::events::dispatcher::EventDispatcher;
use crate::events::VacancyEvent;
use crate::models::vacancy::Vacancy;
use crate::repositories::vacancy_repository::VacancyRepository;

/// Sort fields accepted by the filtered listing.
const SORTABLE_FIELDS: &[&str] = &["id", "title", "company"];

const MAX_PAGE: i64 = 1_000;
const MAX_PAGE_SIZE: i64 = 750;

/// Application service for job vacancies: orchestrates repository calls and
/// publishes a domain event after each successful mutation. Repository
/// failures propagate untouched and suppress the event.
#[derive(Clone)]
pub struct VacancyService {
    repository: Arc<dyn VacancyRepository>,
    dispatcher: Arc<dyn EventDispatcher>,
}

impl VacancyService {
    pub fn new(repository: Arc<dyn VacancyRepository>, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    pub async fn create(&self, vacancy: &mut Vacancy) -> Result<()> {
        self.repository.save(vacancy).await?;
        self.dispatcher
            .dispatch(VacancyEvent::created(vacancy.id))
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Vacancy> {
        self.repository.get(id).await
    }

    pub async fn update(&self, vacancy: &mut Vacancy) -> Result<()> {
        self.repository.update(vacancy).await?;
        self.dispatcher
            .dispatch(VacancyEvent::updated(vacancy.id))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await?;
        self.dispatcher.dispatch(VacancyEvent::deleted(id)).await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Vacancy>> {
        self.repository.get_list().await
    }

    /// Filtered listing. Sort and pagination input is validated here, before
    /// anything reaches the query builder.
    #[allow(clippy::too_many_arguments)]
    pub async fn list_filtered(
        &self,
        title: &str,
        company: &str,
        page: i64,
        page_size: i64,
        sort_field: &str,
        sort_order: &str,
    ) -> Result<Vec<Vacancy>> {
        validate_filters(page, page_size, sort_field, sort_order)?;
        self.repository
            .get_filtered_list(title, company, page, page_size, sort_field, sort_order)
            .await
    }

    pub async fn purge(&self) -> Result<()> {
        self.repository.purge().await
    }
}

fn validate_filters(page: i64, page_size: i64, sort_field: &str, sort_order: &str) -> Result<()> {
    if page < 1 || page > MAX_PAGE {
        return Err(Error::BadRequest(format!(
            "page must be between 1 and {}",
            MAX_PAGE
        )));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(Error::BadRequest(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    if !sort_field.is_empty() && !SORTABLE_FIELDS.contains(&sort_field) {
        return Err(Error::BadRequest(format!(
            "sort_field must be one of: {}",
            SORTABLE_FIELDS.join(", ")
        )));
    }
    if !sort_order.is_empty() && !sort_order.eq_ignore_ascii_case("asc")
        && !sort_order.eq_ignore_ascii_case("desc")
    {
        return Err(Error::BadRequest(
            "sort_order must be ASC or DESC".to_string(),
        ));
    }
    Ok(())
}
