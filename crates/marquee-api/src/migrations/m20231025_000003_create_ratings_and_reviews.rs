use sea_orm_migration::prelude::*;

use super::m20231025_000001_create_catalog_tables::Movies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RatingStars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RatingStars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RatingStars::Value)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert()
            .into_table(RatingStars::Table)
            .columns([RatingStars::Value])
            .to_owned();
        for value in 1..=5 {
            seed.values([value.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(seed).await?;

        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ratings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ratings::Ip).string_len(45).not_null())
                    .col(ColumnDef::new(Ratings::StarId).integer().not_null())
                    .col(ColumnDef::new(Ratings::MovieId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_star")
                            .from(Ratings::Table, Ratings::StarId)
                            .to(RatingStars::Table, RatingStars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_movie")
                            .from(Ratings::Table, Ratings::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Conflict target for re-rating.
        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_ip_movie")
                    .table(Ratings::Table)
                    .col(Ratings::Ip)
                    .col(Ratings::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::Email).string().not_null())
                    .col(ColumnDef::new(Reviews::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Reviews::Text).text().not_null())
                    .col(ColumnDef::new(Reviews::ParentId).integer().null())
                    .col(ColumnDef::new(Reviews::MovieId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_parent")
                            .from(Reviews::Table, Reviews::ParentId)
                            .to(Reviews::Table, Reviews::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_movie")
                            .from(Reviews::Table, Reviews::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RatingStars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RatingStars {
    Table,
    Id,
    Value,
}

#[derive(Iden)]
enum Ratings {
    Table,
    Id,
    Ip,
    StarId,
    MovieId,
}

#[derive(Iden)]
enum Reviews {
    Table,
    Id,
    Email,
    Name,
    Text,
    ParentId,
    MovieId,
}
