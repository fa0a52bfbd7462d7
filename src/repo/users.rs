use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged,
};

use crate::{
    entities::{company, company_staff, film, film_crew, user},
    error::{AppError, AppResult},
    models::{
        Affiliation, AffiliationPatch, CreateUser, FilmCredit, FilmCreditPatch, Pagination,
        UpdateUser, UserDetail,
    },
    reconcile,
};

#[derive(Clone)]
pub struct UserRepo {
    db: DatabaseConnection,
}

impl UserRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> AppResult<UserDetail> {
        let found = user::Entity::find_by_id(id).one(&self.db).await?;
        let Some(found) = found else {
            return Err(AppError::not_found("user", id));
        };
        let mut details = hydrate(&self.db, vec![found]).await?;
        details.pop().ok_or_else(|| AppError::not_found("user", id))
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<UserDetail> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        let Some(found) = found else {
            return Err(AppError::not_found_by("user", "email", email));
        };
        let mut details = hydrate(&self.db, vec![found]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::not_found_by("user", "email", email))
    }

    pub async fn list(&self, page: &Pagination) -> AppResult<Vec<UserDetail>> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await?;
        hydrate(&self.db, users).await
    }

    pub async fn create(&self, input: CreateUser) -> AppResult<UserDetail> {
        let txn = self.db.begin().await?;

        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(input.email.as_str()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(AppError::Duplicate {
                entity: "user",
                field: "email",
                value: input.email,
            });
        }

        let created = user::ActiveModel {
            id: Default::default(),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            minimum_fee: Set(input.minimum_fee),
        }
        .insert(&txn)
        .await?;

        let films: Vec<FilmCreditPatch> = input.films.into_iter().map(Into::into).collect();
        let companies: Vec<AffiliationPatch> =
            input.companies.into_iter().map(Into::into).collect();
        reconcile::sync_user_films(&txn, created.id, &films).await?;
        reconcile::sync_user_companies(&txn, created.id, &companies).await?;

        txn.commit().await?;
        self.get(created.id).await
    }

    pub async fn update(&self, input: UpdateUser) -> AppResult<UserDetail> {
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(input.id).one(&txn).await?.is_none() {
            return Err(AppError::not_found("user", input.id));
        }

        user::ActiveModel {
            id: Unchanged(input.id),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            minimum_fee: Set(input.minimum_fee),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        reconcile::sync_user_films(&txn, input.id, &input.films).await?;
        reconcile::sync_user_companies(&txn, input.id, &input.companies).await?;

        txn.commit().await?;
        self.get(input.id).await
    }
}

async fn hydrate(db: &DatabaseConnection, users: Vec<user::Model>) -> AppResult<Vec<UserDetail>> {
    let crew = users.load_many(film_crew::Entity, db).await?;
    let staff = users.load_many(company_staff::Entity, db).await?;

    let film_ids: Vec<i32> = crew.iter().flatten().map(|row| row.film_id).collect();
    let films: HashMap<i32, film::Model> = film::Entity::find()
        .filter(film::Column::Id.is_in(film_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let company_ids: Vec<i32> = staff.iter().flatten().map(|row| row.company_id).collect();
    let companies: HashMap<i32, company::Model> = company::Entity::find()
        .filter(company::Column::Id.is_in(company_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut details = Vec::with_capacity(users.len());
    for ((user, mut crew_rows), mut staff_rows) in users.into_iter().zip(crew).zip(staff) {
        crew_rows.sort_by_key(|row| row.film_id);
        staff_rows.sort_by_key(|row| row.company_id);

        let mut film_credits = Vec::with_capacity(crew_rows.len());
        for row in crew_rows {
            let Some(film) = films.get(&row.film_id) else {
                continue;
            };
            film_credits.push(FilmCredit {
                role: row.role,
                film: film.clone().into(),
            });
        }

        let mut affiliations = Vec::with_capacity(staff_rows.len());
        for row in staff_rows {
            let Some(company) = companies.get(&row.company_id) else {
                continue;
            };
            affiliations.push(Affiliation {
                role: row.role,
                company: company.clone().into(),
            });
        }

        details.push(UserDetail {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            minimum_fee: user.minimum_fee,
            films: film_credits,
            companies: affiliations,
        });
    }

    Ok(details)
}
