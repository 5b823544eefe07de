pub use sea_orm_migration::prelude::*;

mod m20231020_000001_create_users_table;
mod m20231020_000002_create_tokens_table;

/// Migrations for accounts and the token store.
///
/// Applications with their own tables should chain these in front of theirs
/// (see [`Migrator::migrations`]) so one `seaql_migrations` table tracks both.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20231020_000001_create_users_table::Migration),
            Box::new(m20231020_000002_create_tokens_table::Migration),
        ]
    }
}
