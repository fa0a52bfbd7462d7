use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    Set, Unchanged,
};

use crate::{
    entities::{company, company_staff, film, film_crew, user},
    error::{AppError, AppResult},
    models::{AffiliationPatch, FilmCreditPatch, StaffMemberPatch},
};

pub async fn sync_user_films(
    txn: &DatabaseTransaction,
    user_id: i32,
    desired: &[FilmCreditPatch],
) -> AppResult<()> {
    let linked: Vec<i32> = film_crew::Entity::find()
        .filter(film_crew::Column::UserId.eq(user_id))
        .all(txn)
        .await?
        .into_iter()
        .map(|row| row.film_id)
        .collect();

    // Every id in the desired list must already be linked to this user,
    // checked before any write lands
    for entry in desired {
        if let Some(id) = entry.film.id {
            if !linked.contains(&id) {
                return Err(AppError::UnknownLink {
                    owner: "user",
                    entity: "film",
                    id,
                });
            }
        }
    }

    let mut keep = Vec::with_capacity(desired.len());
    for entry in desired {
        ensure_company_exists(txn, entry.film.company_id).await?;
        let film_id = match entry.film.id {
            Some(film_id) => {
                film::ActiveModel {
                    id: Unchanged(film_id),
                    title: Set(entry.film.title.clone()),
                    description: Set(entry.film.description.clone()),
                    budget: Set(entry.film.budget),
                    release_year: Set(entry.film.release_year),
                    genres: Set(film::Genres(entry.film.genres.clone())),
                    company_id: Set(entry.film.company_id),
                }
                .update(txn)
                .await?;

                film_crew::Entity::update_many()
                    .col_expr(
                        film_crew::Column::Role,
                        sea_orm::sea_query::Expr::value(entry.role),
                    )
                    .filter(film_crew::Column::UserId.eq(user_id))
                    .filter(film_crew::Column::FilmId.eq(film_id))
                    .exec(txn)
                    .await?;
                film_id
            }
            None => {
                let created = film::ActiveModel {
                    id: Default::default(),
                    title: Set(entry.film.title.clone()),
                    description: Set(entry.film.description.clone()),
                    budget: Set(entry.film.budget),
                    release_year: Set(entry.film.release_year),
                    genres: Set(film::Genres(entry.film.genres.clone())),
                    company_id: Set(entry.film.company_id),
                }
                .insert(txn)
                .await?;

                let link = film_crew::ActiveModel {
                    user_id: Set(user_id),
                    film_id: Set(created.id),
                    role: Set(entry.role),
                };
                film_crew::Entity::insert(link)
                    .exec_without_returning(txn)
                    .await?;
                created.id
            }
        };
        keep.push(film_id);
    }

    // Links the desired list no longer names are dropped; an empty list
    // clears the lot
    let mut evict =
        film_crew::Entity::delete_many().filter(film_crew::Column::UserId.eq(user_id));
    if !keep.is_empty() {
        evict = evict.filter(film_crew::Column::FilmId.is_not_in(keep));
    }
    evict.exec(txn).await?;

    Ok(())
}

pub async fn sync_user_companies(
    txn: &DatabaseTransaction,
    user_id: i32,
    desired: &[AffiliationPatch],
) -> AppResult<()> {
    let linked: Vec<i32> = company_staff::Entity::find()
        .filter(company_staff::Column::UserId.eq(user_id))
        .all(txn)
        .await?
        .into_iter()
        .map(|row| row.company_id)
        .collect();

    for entry in desired {
        if let Some(id) = entry.company.id {
            if !linked.contains(&id) {
                return Err(AppError::UnknownLink {
                    owner: "user",
                    entity: "company",
                    id,
                });
            }
        }
    }

    let mut keep = Vec::with_capacity(desired.len());
    for entry in desired {
        let company_id = match entry.company.id {
            Some(company_id) => {
                company::ActiveModel {
                    id: Unchanged(company_id),
                    name: Set(entry.company.name.clone()),
                    contact_email: Set(entry.company.contact_email.clone()),
                    phone: Set(entry.company.phone.clone()),
                }
                .update(txn)
                .await?;

                company_staff::Entity::update_many()
                    .col_expr(
                        company_staff::Column::Role,
                        sea_orm::sea_query::Expr::value(entry.role),
                    )
                    .filter(company_staff::Column::UserId.eq(user_id))
                    .filter(company_staff::Column::CompanyId.eq(company_id))
                    .exec(txn)
                    .await?;
                company_id
            }
            None => {
                let created = company::ActiveModel {
                    id: Default::default(),
                    name: Set(entry.company.name.clone()),
                    contact_email: Set(entry.company.contact_email.clone()),
                    phone: Set(entry.company.phone.clone()),
                }
                .insert(txn)
                .await?;

                let link = company_staff::ActiveModel {
                    user_id: Set(user_id),
                    company_id: Set(created.id),
                    role: Set(entry.role),
                };
                company_staff::Entity::insert(link)
                    .exec_without_returning(txn)
                    .await?;
                created.id
            }
        };
        keep.push(company_id);
    }

    let mut evict =
        company_staff::Entity::delete_many().filter(company_staff::Column::UserId.eq(user_id));
    if !keep.is_empty() {
        evict = evict.filter(company_staff::Column::CompanyId.is_not_in(keep));
    }
    evict.exec(txn).await?;

    Ok(())
}

pub async fn sync_company_staff(
    txn: &DatabaseTransaction,
    company_id: i32,
    desired: &[StaffMemberPatch],
) -> AppResult<()> {
    let linked: Vec<i32> = company_staff::Entity::find()
        .filter(company_staff::Column::CompanyId.eq(company_id))
        .all(txn)
        .await?
        .into_iter()
        .map(|row| row.user_id)
        .collect();

    for entry in desired {
        if let Some(id) = entry.user.id {
            if !linked.contains(&id) {
                return Err(AppError::UnknownLink {
                    owner: "company",
                    entity: "user",
                    id,
                });
            }
        }
    }

    let mut keep = Vec::with_capacity(desired.len());
    for entry in desired {
        let user_id = match entry.user.id {
            Some(user_id) => {
                // Email keeps its signup value even when the entry carries one
                user::ActiveModel {
                    id: Unchanged(user_id),
                    first_name: Set(entry.user.first_name.clone()),
                    last_name: Set(entry.user.last_name.clone()),
                    minimum_fee: Set(entry.user.minimum_fee),
                    ..Default::default()
                }
                .update(txn)
                .await?;

                company_staff::Entity::update_many()
                    .col_expr(
                        company_staff::Column::Role,
                        sea_orm::sea_query::Expr::value(entry.role),
                    )
                    .filter(company_staff::Column::CompanyId.eq(company_id))
                    .filter(company_staff::Column::UserId.eq(user_id))
                    .exec(txn)
                    .await?;
                user_id
            }
            None => {
                let Some(email) = entry.user.email.clone() else {
                    return Err(missing_staff_email());
                };
                let created = user::ActiveModel {
                    id: Default::default(),
                    first_name: Set(entry.user.first_name.clone()),
                    last_name: Set(entry.user.last_name.clone()),
                    email: Set(email),
                    minimum_fee: Set(entry.user.minimum_fee),
                }
                .insert(txn)
                .await?;

                let link = company_staff::ActiveModel {
                    user_id: Set(created.id),
                    company_id: Set(company_id),
                    role: Set(entry.role),
                };
                company_staff::Entity::insert(link)
                    .exec_without_returning(txn)
                    .await?;
                created.id
            }
        };
        keep.push(user_id);
    }

    let mut evict = company_staff::Entity::delete_many()
        .filter(company_staff::Column::CompanyId.eq(company_id));
    if !keep.is_empty() {
        evict = evict.filter(company_staff::Column::UserId.is_not_in(keep));
    }
    evict.exec(txn).await?;

    Ok(())
}

pub async fn ensure_company_exists<C: ConnectionTrait>(
    conn: &C,
    company_id: Option<i32>,
) -> AppResult<()> {
    let Some(id) = company_id else {
        return Ok(());
    };
    if company::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::BadReference {
            entity: "company",
            id,
        });
    }
    Ok(())
}

fn missing_staff_email() -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(
        "email".into(),
        validator::ValidationError::new("email_required"),
    );
    errors.into()
}
