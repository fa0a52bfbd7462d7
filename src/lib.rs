pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod repo;
pub mod routes;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::repo::{CompanyRepo, FilmRepo, UserRepo};

#[derive(Clone)]
pub struct AppState {
    pub users: UserRepo,
    pub films: FilmRepo,
    pub companies: CompanyRepo,
}

pub fn app(db: DatabaseConnection) -> Router {
    let state = AppState {
        users: UserRepo::new(db.clone()),
        films: FilmRepo::new(db.clone()),
        companies: CompanyRepo::new(db),
    };

    Router::new()
        .route("/users", get(routes::list_users).post(routes::create_user))
        .route("/users/{id}", get(routes::get_user).post(routes::update_user))
        .route("/users/email/{email}", get(routes::get_user_by_email))
        .route("/films", get(routes::list_films).post(routes::create_film))
        .route("/films/{id}", get(routes::get_film).post(routes::update_film))
        .route("/films/title/{title}", get(routes::get_film_by_title))
        .route("/companies", get(routes::list_companies).post(routes::create_company))
        .route("/companies/{id}", get(routes::get_company).post(routes::update_company))
        .route("/companies/name/{name}", get(routes::get_company_by_name))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
