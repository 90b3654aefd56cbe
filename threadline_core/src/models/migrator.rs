use sea_orm_migration::prelude::*;

mod m20261016_000001_create_post_table;
mod m20261016_000002_create_forum_table;
mod m20261016_000003_create_comment_table;
mod m20261016_000004_create_comment_closure_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_post_table::Migration),
            Box::new(m20261016_000002_create_forum_table::Migration),
            Box::new(m20261016_000003_create_comment_table::Migration),
            Box::new(m20261016_000004_create_comment_closure_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    #[tokio::test]
    async fn test_migrations_okay() -> Result<(), DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        let schema_manager = SchemaManager::new(&db);

        Migrator::refresh(&db).await?;

        assert!(schema_manager.has_table("post").await?);
        assert!(schema_manager.has_table("forum").await?);
        assert!(schema_manager.has_table("comment").await?);
        assert!(schema_manager.has_table("comment_closure").await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_migrations_roll_back() -> Result<(), DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        let schema_manager = SchemaManager::new(&db);

        Migrator::up(&db, None).await?;
        Migrator::down(&db, None).await?;

        assert!(!schema_manager.has_table("comment_closure").await?);
        assert!(!schema_manager.has_table("comment").await?);

        Ok(())
    }
}
