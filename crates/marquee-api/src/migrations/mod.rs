pub use sea_orm_migration::prelude::*;

mod m20231025_000001_create_catalog_tables;
mod m20231025_000002_create_movie_links;
mod m20231025_000003_create_ratings_and_reviews;

/// Account tables followed by the catalog tables.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        let mut migrations = marquee_core::migrations::Migrator::migrations();
        migrations.push(Box::new(m20231025_000001_create_catalog_tables::Migration));
        migrations.push(Box::new(m20231025_000002_create_movie_links::Migration));
        migrations.push(Box::new(
            m20231025_000003_create_ratings_and_reviews::Migration,
        ));
        migrations
    }
}
