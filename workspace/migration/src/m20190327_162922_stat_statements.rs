use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Extension catalogs only exist on PostgreSQL; on other backends
        // (the SQLite test database) this step applies as a no-op.
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }

        // IF NOT EXISTS folds the existence check into the statement, so
        // re-running against a prepared database is a no-op and two
        // runners cannot race a separate check against the create.
        manager
            .get_connection()
            .execute_unprepared(r#"CREATE EXTENSION IF NOT EXISTS "pg_stat_statements""#)
            .await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Dropping the extension would discard statement statistics shared
        // with other tooling; reversal is not supported.
        Err(DbErr::Migration(
            "pg_stat_statements step cannot be reverted".to_owned(),
        ))
    }
}
