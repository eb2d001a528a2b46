use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KycSubmissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(KycSubmissions::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(KycSubmissions::EmployeeId).string().not_null())
                    .col(ColumnDef::new(KycSubmissions::FullName).string().not_null())
                    .col(ColumnDef::new(KycSubmissions::Email).string())
                    .col(ColumnDef::new(KycSubmissions::Status).string().not_null().default("pending"))
                    // JSON text: uploaded files plus personal/bank/emergency sub-objects
                    .col(ColumnDef::new(KycSubmissions::Documents).text().not_null())
                    // JSON text: per-document-type status and remark
                    .col(ColumnDef::new(KycSubmissions::DocumentReviews).text().not_null())
                    .col(ColumnDef::new(KycSubmissions::Remarks).string())
                    .col(ColumnDef::new(KycSubmissions::ReviewedBy).string())
                    .col(ColumnDef::new(KycSubmissions::ReviewedAt).big_integer())
                    .col(ColumnDef::new(KycSubmissions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(KycSubmissions::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_kyc_submissions_employee_id")
                    .table(KycSubmissions::Table)
                    .col(KycSubmissions::EmployeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KycSubmissions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum KycSubmissions {
    Table,
    Id,
    EmployeeId,
    FullName,
    Email,
    Status,
    Documents,
    DocumentReviews,
    Remarks,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}
