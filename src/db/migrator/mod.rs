use sea_orm_migration::prelude::*;

mod m20251001_initial;
mod m20251002_content_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_initial::Migration),
            Box::new(m20251002_content_indexes::Migration),
        ]
    }
}
