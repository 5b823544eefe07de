use sea_orm_migration::prelude::*;

use super::m20231025_000001_create_catalog_tables::{Actors, Genres, Movies};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Build a `(movie_id, <other>_id)` join table keyed on both columns.
fn link_table<T, C, O>(table: T, other: C, other_table: O, fk_name: &str) -> TableCreateStatement
where
    T: IntoIden + Clone + 'static,
    C: IntoIden + Clone + 'static,
    O: IntoIden + 'static,
{
    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(ColumnDef::new(Link::MovieId).integer().not_null())
        .col(ColumnDef::new(other.clone()).integer().not_null())
        .primary_key(Index::create().col(Link::MovieId).col(other.clone()))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_movie", fk_name))
                .from(table.clone(), Link::MovieId)
                .to(Movies::Table, Movies::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_target", fk_name))
                .from(table, other)
                .to(other_table, Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(link_table(
                MovieDirectors::Table,
                MovieDirectors::DirectorId,
                Actors::Table,
                "movie_directors",
            ))
            .await?;
        manager
            .create_table(link_table(
                MovieActors::Table,
                MovieActors::ActorId,
                Actors::Table,
                "movie_actors",
            ))
            .await?;
        manager
            .create_table(link_table(
                MovieGenres::Table,
                MovieGenres::GenreId,
                Genres::Table,
                "movie_genres",
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieGenres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieActors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieDirectors::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone)]
enum Link {
    MovieId,
}

#[derive(Iden, Clone)]
enum MovieDirectors {
    Table,
    DirectorId,
}

#[derive(Iden, Clone)]
enum MovieActors {
    Table,
    ActorId,
}

#[derive(Iden, Clone)]
enum MovieGenres {
    Table,
    GenreId,
}
