use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged,
};

use crate::{
    entities::{film, film_crew, user},
    error::{AppError, AppResult},
    models::{CreateFilm, CrewMember, FilmDetail, Pagination, UpdateFilm},
    reconcile,
};

#[derive(Clone)]
pub struct FilmRepo {
    db: DatabaseConnection,
}

impl FilmRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> AppResult<FilmDetail> {
        let found = film::Entity::find_by_id(id).one(&self.db).await?;
        let Some(found) = found else {
            return Err(AppError::not_found("film", id));
        };
        let mut details = hydrate(&self.db, vec![found]).await?;
        details.pop().ok_or_else(|| AppError::not_found("film", id))
    }

    pub async fn get_by_title(&self, title: &str) -> AppResult<FilmDetail> {
        let found = film::Entity::find()
            .filter(film::Column::Title.eq(title))
            .one(&self.db)
            .await?;
        let Some(found) = found else {
            return Err(AppError::not_found_by("film", "title", title));
        };
        let mut details = hydrate(&self.db, vec![found]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::not_found_by("film", "title", title))
    }

    pub async fn list(&self, page: &Pagination) -> AppResult<Vec<FilmDetail>> {
        let films = film::Entity::find()
            .order_by_asc(film::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await?;
        hydrate(&self.db, films).await
    }

    pub async fn create(&self, input: CreateFilm) -> AppResult<FilmDetail> {
        let txn = self.db.begin().await?;

        let taken = film::Entity::find()
            .filter(film::Column::Title.eq(input.title.as_str()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(AppError::Duplicate {
                entity: "film",
                field: "title",
                value: input.title,
            });
        }
        reconcile::ensure_company_exists(&txn, input.company_id).await?;

        let created = film::ActiveModel {
            id: Default::default(),
            title: Set(input.title),
            description: Set(input.description),
            budget: Set(input.budget),
            release_year: Set(input.release_year),
            genres: Set(film::Genres(input.genres)),
            company_id: Set(input.company_id),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        self.get(created.id).await
    }

    pub async fn update(&self, input: UpdateFilm) -> AppResult<FilmDetail> {
        let txn = self.db.begin().await?;

        if film::Entity::find_by_id(input.id).one(&txn).await?.is_none() {
            return Err(AppError::not_found("film", input.id));
        }
        reconcile::ensure_company_exists(&txn, input.company_id).await?;

        film::ActiveModel {
            id: Unchanged(input.id),
            title: Set(input.title),
            description: Set(input.description),
            budget: Set(input.budget),
            release_year: Set(input.release_year),
            genres: Set(film::Genres(input.genres)),
            company_id: Set(input.company_id),
        }
        .update(&txn)
        .await?;

        txn.commit().await?;
        self.get(input.id).await
    }
}

async fn hydrate(db: &DatabaseConnection, films: Vec<film::Model>) -> AppResult<Vec<FilmDetail>> {
    let crew = films.load_many(film_crew::Entity, db).await?;

    let user_ids: Vec<i32> = crew.iter().flatten().map(|row| row.user_id).collect();
    let users: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut details = Vec::with_capacity(films.len());
    for (film, mut crew_rows) in films.into_iter().zip(crew) {
        crew_rows.sort_by_key(|row| row.user_id);

        let mut members = Vec::with_capacity(crew_rows.len());
        for row in crew_rows {
            let Some(user) = users.get(&row.user_id) else {
                continue;
            };
            members.push(CrewMember {
                role: row.role,
                user: user.clone().into(),
            });
        }

        details.push(FilmDetail {
            id: film.id,
            title: film.title,
            description: film.description,
            budget: film.budget,
            release_year: film.release_year,
            genres: film.genres.0,
            company_id: film.company_id,
            crew: members,
        });
    }

    Ok(details)
}
