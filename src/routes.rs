use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        CompanyDetail, CreateCompany, CreateFilm, CreateUser, FilmDetail, Pagination,
        UpdateCompany, UpdateFilm, UpdateUser, UserDetail,
    },
};

pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<UserDetail>>> {
    Ok(Json(state.users.list(&page).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserDetail>> {
    Ok(Json(state.users.get(id).await?))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserDetail>> {
    Ok(Json(state.users.get_by_email(&email).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserDetail>)> {
    payload.validate()?;
    let user = state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUser>,
) -> AppResult<Json<UserDetail>> {
    if payload.id != id {
        return Err(AppError::IdMismatch {
            path: id,
            body: payload.id,
        });
    }
    payload.validate()?;
    Ok(Json(state.users.update(payload).await?))
}

pub async fn list_films(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<FilmDetail>>> {
    Ok(Json(state.films.list(&page).await?))
}

pub async fn get_film(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<FilmDetail>> {
    Ok(Json(state.films.get(id).await?))
}

pub async fn get_film_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<Json<FilmDetail>> {
    Ok(Json(state.films.get_by_title(&title).await?))
}

pub async fn create_film(
    State(state): State<AppState>,
    Json(payload): Json<CreateFilm>,
) -> AppResult<(StatusCode, Json<FilmDetail>)> {
    payload.validate()?;
    let film = state.films.create(payload).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

pub async fn update_film(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFilm>,
) -> AppResult<Json<FilmDetail>> {
    if payload.id != id {
        return Err(AppError::IdMismatch {
            path: id,
            body: payload.id,
        });
    }
    payload.validate()?;
    Ok(Json(state.films.update(payload).await?))
}

pub async fn list_companies(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<CompanyDetail>>> {
    Ok(Json(state.companies.list(&page).await?))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CompanyDetail>> {
    Ok(Json(state.companies.get(id).await?))
}

pub async fn get_company_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<CompanyDetail>> {
    Ok(Json(state.companies.get_by_name(&name).await?))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<CompanyDetail>)> {
    payload.validate()?;
    let company = state.companies.create(payload).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCompany>,
) -> AppResult<Json<CompanyDetail>> {
    if payload.id != id {
        return Err(AppError::IdMismatch {
            path: id,
            body: payload.id,
        });
    }
    payload.validate()?;
    Ok(Json(state.companies.update(payload).await?))
}
