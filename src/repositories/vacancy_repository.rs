use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::persistence::criteria::{FilterValue, SearchCriteriaBuilder};
use crate::persistence::query::QueryBuilderPool;

/// Persistence contract for the vacancy aggregate.
///
/// Implementations are stateless and safe for concurrent use; every mutating
/// operation runs in its own transaction and never returns with one open.
/// Cancellation is cooperative: dropping an in-flight future before commit
/// rolls the transaction back, so a cancelled mutation never takes effect.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacancyRepository: Send + Sync {
    /// Inserts a new vacancy. The database assigns `id` and `version` (1),
    /// which are written back into the entity on success only.
    async fn save(&self, vacancy: &mut Vacancy) -> Result<()>;

    /// Fetches a vacancy by primary key. A missing row is `Error::NotFound`,
    /// distinguishable from infrastructure failures.
    async fn get(&self, id: i64) -> Result<Vacancy>;

    /// Updates a vacancy using optimistic concurrency control: the
    /// caller-supplied `version` is compared in the same statement that
    /// increments it. A stale version is `Error::Conflict`, a missing id is
    /// `Error::NotFound`; on success the entity's `version` advances to the
    /// stored value.
    async fn update(&self, vacancy: &mut Vacancy) -> Result<()>;

    /// Deletes by id. Zero affected rows is `Error::NotFound`, never a
    /// silent no-op.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Full scan with no ordering guarantee beyond the store's natural
    /// order. Callers needing a defined order use the filtered path.
    async fn get_list(&self) -> Result<Vec<Vacancy>>;

    /// Filtered, ordered, paginated listing. Non-empty `title`/`company`
    /// become case-insensitive substring filters combined with AND. An empty
    /// `sort_field` falls back to `title ASC`. Rows deleted concurrently
    /// mid-scan may simply be absent from the result (read-committed
    /// semantics).
    async fn get_filtered_list(
        &self,
        title: &str,
        company: &str,
        page: i64,
        page_size: i64,
        sort_field: &str,
        sort_order: &str,
    ) -> Result<Vec<Vacancy>>;

    /// Irreversibly removes all vacancies and resets the identity sequence,
    /// so the next save produces id 1. Intended for test/reset use.
    async fn purge(&self) -> Result<()>;
}

const SELECT_COLUMNS: &str =
    "SELECT id, title, company, description, posted_at, location, version FROM job_vacancies";

const DEFAULT_SORT_FIELD: &str = "title";
const DEFAULT_SORT_ORDER: &str = "ASC";

/// PostgreSQL-backed [`VacancyRepository`]. Sole owner of the mapping between
/// [`Vacancy`] and `job_vacancies` rows and of the transaction lifecycle for
/// this aggregate.
pub struct PgVacancyRepository {
    pool: PgPool,
    builders: QueryBuilderPool,
}

impl PgVacancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            builders: QueryBuilderPool::new(),
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(Error::Database)
    }
}

/// Commits, reporting a commit failure even though the statements succeeded.
async fn commit(tx: Transaction<'static, Postgres>) -> Result<()> {
    tx.commit().await.map_err(Error::Database)
}

/// Rolls back and propagates the original error. A rollback failure does not
/// mask the cause; both are surfaced together.
async fn rollback<T>(tx: Transaction<'static, Postgres>, cause: Error) -> Result<T> {
    match tx.rollback().await {
        Ok(()) => Err(cause),
        Err(rollback) => Err(Error::Rollback {
            source: Box::new(cause),
            rollback,
        }),
    }
}

#[async_trait]
impl VacancyRepository for PgVacancyRepository {
    async fn save(&self, vacancy: &mut Vacancy) -> Result<()> {
        let mut tx = self.begin().await?;

        let inserted = sqlx::query_as::<_, (i64, i32)>(
            "INSERT INTO job_vacancies (title, company, description, posted_at, location) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id, version",
        )
        .bind(vacancy.title.as_str())
        .bind(vacancy.company.as_str())
        .bind(vacancy.description.as_str())
        .bind(vacancy.posted_at)
        .bind(vacancy.location.as_str())
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok((id, version)) => {
                commit(tx).await?;
                vacancy.id = id;
                vacancy.version = version;
                Ok(())
            }
            Err(err) => rollback(tx, Error::Database(err)).await,
        }
    }

    async fn get(&self, id: i64) -> Result<Vacancy> {
        let query = format!("{} WHERE id = $1", SELECT_COLUMNS);
        sqlx::query_as::<_, Vacancy>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => {
                    Error::NotFound(format!("vacancy with id {} does not exist", id))
                }
                other => Error::Database(other),
            })
    }

    async fn update(&self, vacancy: &mut Vacancy) -> Result<()> {
        let mut tx = self.begin().await?;

        // The version check and increment happen in one statement, so exactly
        // one of two racing updates with the same stale version can succeed.
        let updated = sqlx::query_scalar::<_, i32>(
            "UPDATE job_vacancies \
             SET title = $1, company = $2, description = $3, posted_at = $4, location = $5, \
                 version = version + 1 \
             WHERE id = $6 AND version = $7 RETURNING version",
        )
        .bind(vacancy.title.as_str())
        .bind(vacancy.company.as_str())
        .bind(vacancy.description.as_str())
        .bind(vacancy.posted_at)
        .bind(vacancy.location.as_str())
        .bind(vacancy.id)
        .bind(vacancy.version)
        .fetch_one(&mut *tx)
        .await;

        match updated {
            Ok(version) => {
                commit(tx).await?;
                vacancy.version = version;
                Ok(())
            }
            Err(sqlx::Error::RowNotFound) => {
                // Zero rows means the id is gone or the version is stale;
                // probe inside the same transaction to tell the two apart.
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM job_vacancies WHERE id = $1)",
                )
                .bind(vacancy.id)
                .fetch_one(&mut *tx)
                .await;

                let cause = match exists {
                    Ok(true) => Error::Conflict(format!(
                        "vacancy {} was modified concurrently (stale version {})",
                        vacancy.id, vacancy.version
                    )),
                    Ok(false) => {
                        Error::NotFound(format!("vacancy with id {} does not exist", vacancy.id))
                    }
                    Err(err) => Error::Database(err),
                };
                rollback(tx, cause).await
            }
            Err(err) => rollback(tx, Error::Database(err)).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.begin().await?;

        let deleted = sqlx::query("DELETE FROM job_vacancies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await;

        match deleted {
            Ok(done) if done.rows_affected() == 0 => {
                let cause = Error::NotFound(format!("vacancy with id {} does not exist", id));
                rollback(tx, cause).await
            }
            Ok(_) => commit(tx).await,
            Err(err) => rollback(tx, Error::Database(err)).await,
        }
    }

    async fn get_list(&self) -> Result<Vec<Vacancy>> {
        let list = sqlx::query_as::<_, Vacancy>(SELECT_COLUMNS)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(list)
    }

    async fn get_filtered_list(
        &self,
        title: &str,
        company: &str,
        page: i64,
        page_size: i64,
        sort_field: &str,
        sort_order: &str,
    ) -> Result<Vec<Vacancy>> {
        let mut criteria_builder = SearchCriteriaBuilder::new();
        if !title.is_empty() {
            criteria_builder = criteria_builder.add_filter("title", "ILIKE", format!("%{}%", title));
        }
        if !company.is_empty() {
            criteria_builder =
                criteria_builder.add_filter("company", "ILIKE", format!("%{}%", company));
        }
        let criteria = criteria_builder.build();

        let (field, order) = if sort_field.is_empty() {
            (DEFAULT_SORT_FIELD, DEFAULT_SORT_ORDER)
        } else if sort_order.is_empty() {
            (sort_field, DEFAULT_SORT_ORDER)
        } else {
            (sort_field, sort_order)
        };

        let mut builder = self.builders.acquire(SELECT_COLUMNS);
        builder.apply_search_criteria(&criteria);
        builder.set_order_by(field, order);
        builder.set_pagination(page, page_size);
        let (query, args) = builder.build(&criteria);
        self.builders.release(builder);

        let mut statement = sqlx::query_as::<_, Vacancy>(&query);
        for arg in args {
            statement = match arg {
                FilterValue::Text(value) => statement.bind(value),
                FilterValue::Int(value) => statement.bind(value),
                FilterValue::Bool(value) => statement.bind(value),
            };
        }
        let list = statement
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(list)
    }

    async fn purge(&self) -> Result<()> {
        let mut tx = self.begin().await?;

        let purged = sqlx::query("TRUNCATE job_vacancies RESTART IDENTITY")
            .execute(&mut *tx)
            .await;

        match purged {
            Ok(_) => commit(tx).await,
            Err(err) => rollback(tx, Error::Database(err)).await,
        }
    }
}
