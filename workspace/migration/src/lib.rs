pub use sea_orm_migration::prelude::*;

mod m20190101_000001_create_users_and_posts;
mod m20190327_162922_stat_statements;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20190101_000001_create_users_and_posts::Migration),
            Box::new(m20190327_162922_stat_statements::Migration),
        ]
    }
}
