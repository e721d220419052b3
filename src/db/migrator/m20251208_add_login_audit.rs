use crate::entities::login_audit;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        manager
            .create_table(
                schema
                    .create_table_from_entity(LoginAudit)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Index on created_at for the newest-first audit view
        manager
            .create_index(
                Index::create()
                    .name("idx_login_audit_created_at")
                    .table(LoginAudit)
                    .col(login_audit::Column::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginAudit).to_owned())
            .await
    }
}
