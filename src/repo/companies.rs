use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, Unchanged,
};

use crate::{
    entities::{company, company_staff, film, user},
    error::{AppError, AppResult},
    models::{
        CompanyDetail, CreateCompany, Pagination, StaffMember, StaffMemberPatch, UpdateCompany,
    },
    reconcile,
};

#[derive(Clone)]
pub struct CompanyRepo {
    db: DatabaseConnection,
}

impl CompanyRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> AppResult<CompanyDetail> {
        let found = company::Entity::find_by_id(id).one(&self.db).await?;
        let Some(found) = found else {
            return Err(AppError::not_found("company", id));
        };
        let mut details = hydrate(&self.db, vec![found]).await?;
        details.pop().ok_or_else(|| AppError::not_found("company", id))
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<CompanyDetail> {
        let found = company::Entity::find()
            .filter(company::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        let Some(found) = found else {
            return Err(AppError::not_found_by("company", "name", name));
        };
        let mut details = hydrate(&self.db, vec![found]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::not_found_by("company", "name", name))
    }

    pub async fn list(&self, page: &Pagination) -> AppResult<Vec<CompanyDetail>> {
        let companies = company::Entity::find()
            .order_by_asc(company::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await?;
        hydrate(&self.db, companies).await
    }

    pub async fn create(&self, input: CreateCompany) -> AppResult<CompanyDetail> {
        let txn = self.db.begin().await?;

        let taken = company::Entity::find()
            .filter(company::Column::Name.eq(input.name.as_str()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(AppError::Duplicate {
                entity: "company",
                field: "name",
                value: input.name,
            });
        }

        let created = company::ActiveModel {
            id: Default::default(),
            name: Set(input.name),
            contact_email: Set(input.contact_email),
            phone: Set(input.phone),
        }
        .insert(&txn)
        .await?;

        // Nested films belong to the company being created, whatever their
        // payload says
        for entry in input.films {
            film::ActiveModel {
                id: Default::default(),
                title: Set(entry.title),
                description: Set(entry.description),
                budget: Set(entry.budget),
                release_year: Set(entry.release_year),
                genres: Set(film::Genres(entry.genres)),
                company_id: Set(Some(created.id)),
            }
            .insert(&txn)
            .await?;
        }

        let staff: Vec<StaffMemberPatch> = input.staff.into_iter().map(Into::into).collect();
        reconcile::sync_company_staff(&txn, created.id, &staff).await?;

        txn.commit().await?;
        self.get(created.id).await
    }

    pub async fn update(&self, input: UpdateCompany) -> AppResult<CompanyDetail> {
        let txn = self.db.begin().await?;

        if company::Entity::find_by_id(input.id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("company", input.id));
        }

        company::ActiveModel {
            id: Unchanged(input.id),
            name: Set(input.name),
            contact_email: Set(input.contact_email),
            phone: Set(input.phone),
        }
        .update(&txn)
        .await?;

        reconcile::sync_company_staff(&txn, input.id, &input.staff).await?;

        txn.commit().await?;
        self.get(input.id).await
    }
}

async fn hydrate(
    db: &DatabaseConnection,
    companies: Vec<company::Model>,
) -> AppResult<Vec<CompanyDetail>> {
    let films = companies.load_many(film::Entity, db).await?;
    let staff = companies.load_many(company_staff::Entity, db).await?;

    let user_ids: Vec<i32> = staff.iter().flatten().map(|row| row.user_id).collect();
    let users: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut details = Vec::with_capacity(companies.len());
    for ((company, mut film_rows), mut staff_rows) in companies.into_iter().zip(films).zip(staff) {
        film_rows.sort_by_key(|f| f.id);
        staff_rows.sort_by_key(|row| row.user_id);

        let mut members = Vec::with_capacity(staff_rows.len());
        for row in staff_rows {
            let Some(user) = users.get(&row.user_id) else {
                continue;
            };
            members.push(StaffMember {
                role: row.role,
                user: user.clone().into(),
            });
        }

        details.push(CompanyDetail {
            id: company.id,
            name: company.name,
            contact_email: company.contact_email,
            phone: company.phone,
            films: film_rows.into_iter().map(Into::into).collect(),
            staff: members,
        });
    }

    Ok(details)
}
