use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::FirstName, 64))
                    .col(string_len(Users::LastName, 64))
                    .col(string_len(Users::Email, 254))
                    .col(integer(Users::MinimumFee))
                    .to_owned(),
            )
            .await?;

        // Not unique: duplicate emails are rejected in the application layer
        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(pk_auto(Companies::Id))
                    .col(string_len(Companies::Name, 32))
                    .col(string_len(Companies::ContactEmail, 254))
                    .col(string_len(Companies::Phone, 15))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_companies_name")
                    .table(Companies::Table)
                    .col(Companies::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(pk_auto(Films::Id))
                    .col(string_len(Films::Title, 32))
                    .col(string_null(Films::Description))
                    .col(integer(Films::Budget))
                    .col(integer(Films::ReleaseYear))
                    .col(json(Films::Genres))
                    .col(integer_null(Films::CompanyId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_films_company")
                            .from(Films::Table, Films::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_films_title")
                    .table(Films::Table)
                    .col(Films::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_films_company")
                    .table(Films::Table)
                    .col(Films::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserFilm::Table)
                    .if_not_exists()
                    .col(integer(UserFilm::UserId))
                    .col(integer(UserFilm::FilmId))
                    .col(string_len(UserFilm::Role, 16))
                    .primary_key(Index::create().col(UserFilm::UserId).col(UserFilm::FilmId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_film_user")
                            .from(UserFilm::Table, UserFilm::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_film_film")
                            .from(UserFilm::Table, UserFilm::FilmId)
                            .to(Films::Table, Films::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The composite key covers user-side lookups; film-side needs its own.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_film_film")
                    .table(UserFilm::Table)
                    .col(UserFilm::FilmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompanyUser::Table)
                    .if_not_exists()
                    .col(integer(CompanyUser::UserId))
                    .col(integer(CompanyUser::CompanyId))
                    .col(string_len(CompanyUser::Role, 16))
                    .primary_key(
                        Index::create().col(CompanyUser::UserId).col(CompanyUser::CompanyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_user_user")
                            .from(CompanyUser::Table, CompanyUser::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_user_company")
                            .from(CompanyUser::Table, CompanyUser::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_company_user_company")
                    .table(CompanyUser::Table)
                    .col(CompanyUser::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CompanyUser::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(UserFilm::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Companies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    MinimumFee,
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    Title,
    Description,
    Budget,
    ReleaseYear,
    Genres,
    CompanyId,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    ContactEmail,
    Phone,
}

#[derive(DeriveIden)]
enum UserFilm {
    Table,
    UserId,
    FilmId,
    Role,
}

#[derive(DeriveIden)]
enum CompanyUser {
    Table,
    UserId,
    CompanyId,
    Role,
}
