use sea_orm_migration::prelude::*;

/// Records that reference an employee by email. They are owned by other parts of the
/// back office and only consumed here as deletion targets.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Attendance::Email).string().not_null())
                    .col(ColumnDef::new(Attendance::Date).string().not_null())
                    .col(ColumnDef::new(Attendance::CheckIn).big_integer())
                    .col(ColumnDef::new(Attendance::CheckOut).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leaves::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leaves::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Leaves::Email).string().not_null())
                    .col(ColumnDef::new(Leaves::LeaveType).string().not_null())
                    .col(ColumnDef::new(Leaves::StartDate).string().not_null())
                    .col(ColumnDef::new(Leaves::EndDate).string().not_null())
                    .col(ColumnDef::new(Leaves::Status).string().not_null().default("pending"))
                    .col(ColumnDef::new(Leaves::AttachmentPath).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payslips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payslips::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Payslips::EmployeeId).integer())
                    .col(ColumnDef::new(Payslips::Email).string())
                    .col(ColumnDef::new(Payslips::Period).string().not_null())
                    .col(ColumnDef::new(Payslips::NetPayCents).big_integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccessLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccessLogs::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AccessLogs::Email).string().not_null())
                    .col(ColumnDef::new(AccessLogs::Action).string().not_null())
                    .col(ColumnDef::new(AccessLogs::IpAddress).string())
                    .col(ColumnDef::new(AccessLogs::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_email")
                    .table(Attendance::Table)
                    .col(Attendance::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leaves_email")
                    .table(Leaves::Table)
                    .col(Leaves::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payslips_email")
                    .table(Payslips::Table)
                    .col(Payslips::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_access_logs_email")
                    .table(AccessLogs::Table)
                    .col(AccessLogs::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payslips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leaves::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    Email,
    Date,
    CheckIn,
    CheckOut,
}

#[derive(DeriveIden)]
enum Leaves {
    Table,
    Id,
    Email,
    LeaveType,
    StartDate,
    EndDate,
    Status,
    AttachmentPath,
}

#[derive(DeriveIden)]
enum Payslips {
    Table,
    Id,
    EmployeeId,
    Email,
    Period,
    NetPayCents,
}

#[derive(DeriveIden)]
enum AccessLogs {
    Table,
    Id,
    Email,
    Action,
    IpAddress,
    CreatedAt,
}
