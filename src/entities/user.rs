use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub minimum_fee: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_crew::Entity")]
    FilmCrew,
    #[sea_orm(has_many = "super::company_staff::Entity")]
    CompanyStaff,
}

impl Related<super::film_crew::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmCrew.def()
    }
}

impl Related<super::company_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyStaff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
