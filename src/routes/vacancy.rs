use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::vacancy_dto::{
        CreateVacancyPayload, UpdateVacancyPayload, VacancyListQuery, VacancyListResponse,
        VacancyResponse,
    },
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    Json(payload): Json<CreateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut vacancy = payload.into_entity()?;
    state.vacancy_service.create(&mut vacancy).await?;
    Ok((StatusCode::CREATED, Json(VacancyResponse::from(vacancy))))
}

#[axum::debug_handler]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let vacancy = state.vacancy_service.get(id).await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}

#[axum::debug_handler]
pub async fn update_vacancy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut vacancy = payload.into_entity(id)?;
    state.vacancy_service.update(&mut vacancy).await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}

#[axum::debug_handler]
pub async fn delete_vacancy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.vacancy_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_vacancies(
    State(state): State<AppState>,
    Query(query): Query<VacancyListQuery>,
) -> Result<impl IntoResponse> {
    let list = state
        .vacancy_service
        .list_filtered(
            query.title.as_deref().unwrap_or(""),
            query.company.as_deref().unwrap_or(""),
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(10),
            query.sort_field.as_deref().unwrap_or(""),
            query.sort_order.as_deref().unwrap_or("ASC"),
        )
        .await?;
    Ok(Json(VacancyListResponse::from(list)))
}

#[axum::debug_handler]
pub async fn list_all_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let list = state.vacancy_service.list().await?;
    Ok(Json(VacancyListResponse::from(list)))
}

#[axum::debug_handler]
pub async fn purge_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.vacancy_service.purge().await?;
    Ok(StatusCode::NO_CONTENT)
}
