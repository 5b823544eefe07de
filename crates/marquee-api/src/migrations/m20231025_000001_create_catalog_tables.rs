use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Categories::Description).text().not_null())
                    .col(
                        ColumnDef::new(Categories::Url)
                            .string_len(160)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genres::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Genres::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Genres::Description).text().not_null())
                    .col(
                        ColumnDef::new(Genres::Url)
                            .string_len(160)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Actors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Actors::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Actors::Age).integer().not_null().default(0))
                    .col(ColumnDef::new(Actors::Description).text().not_null())
                    .col(ColumnDef::new(Actors::Image).string_len(200).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movies::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Movies::Tagline).string_len(100).not_null())
                    .col(ColumnDef::new(Movies::Description).text().not_null())
                    .col(ColumnDef::new(Movies::Poster).string_len(200).not_null())
                    .col(ColumnDef::new(Movies::Year).integer().not_null())
                    .col(ColumnDef::new(Movies::Country).string_len(30).not_null())
                    .col(ColumnDef::new(Movies::WorldPremiere).date().not_null())
                    .col(
                        ColumnDef::new(Movies::Budget)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Movies::FeesInUsa)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Movies::FeesInWorld).big_integer().null())
                    .col(ColumnDef::new(Movies::CategoryId).integer().null())
                    .col(
                        ColumnDef::new(Movies::Url)
                            .string_len(160)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Movies::Draft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_category")
                            .from(Movies::Table, Movies::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    Url,
}

#[derive(Iden)]
pub(crate) enum Genres {
    Table,
    Id,
    Name,
    Description,
    Url,
}

#[derive(Iden)]
pub(crate) enum Actors {
    Table,
    Id,
    Name,
    Age,
    Description,
    Image,
}

#[derive(Iden)]
pub(crate) enum Movies {
    Table,
    Id,
    Title,
    Tagline,
    Description,
    Poster,
    Year,
    Country,
    WorldPremiere,
    Budget,
    FeesInUsa,
    FeesInWorld,
    CategoryId,
    Url,
    Draft,
}
