use sea_orm_migration::prelude::*;

use super::m20260105_000001_create_directory::Schools;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 咨询表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Inquiries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inquiries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inquiries::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Inquiries::Name).string().not_null())
                    .col(ColumnDef::new(Inquiries::Email).string().not_null())
                    .col(ColumnDef::new(Inquiries::Message).text().not_null())
                    .col(ColumnDef::new(Inquiries::Status).string().not_null())
                    .col(ColumnDef::new(Inquiries::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Inquiries::Table, Inquiries::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 招生线索表 ====================
        manager
            .create_table(
                Table::create()
                    .table(AdmissionLeads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdmissionLeads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdmissionLeads::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdmissionLeads::ResumeToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AdmissionLeads::Step).integer().not_null())
                    .col(ColumnDef::new(AdmissionLeads::Status).string().not_null())
                    .col(
                        ColumnDef::new(AdmissionLeads::GuardianName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdmissionLeads::GuardianEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdmissionLeads::GuardianPhone).string().null())
                    .col(ColumnDef::new(AdmissionLeads::StudentName).string().null())
                    .col(
                        ColumnDef::new(AdmissionLeads::StudentBirthDate)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(AdmissionLeads::GradeApplying).integer().null())
                    .col(ColumnDef::new(AdmissionLeads::Notes).text().null())
                    .col(
                        ColumnDef::new(AdmissionLeads::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdmissionLeads::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdmissionLeads::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdmissionLeads::Table, AdmissionLeads::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 招聘职位表 ====================
        manager
            .create_table(
                Table::create()
                    .table(CareerJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CareerJobs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CareerJobs::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(CareerJobs::Title).string().not_null())
                    .col(ColumnDef::new(CareerJobs::Slug).string().not_null())
                    .col(ColumnDef::new(CareerJobs::Department).string().null())
                    .col(ColumnDef::new(CareerJobs::Location).string().null())
                    .col(ColumnDef::new(CareerJobs::EmploymentType).string().not_null())
                    .col(ColumnDef::new(CareerJobs::Description).text().not_null())
                    .col(
                        ColumnDef::new(CareerJobs::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CareerJobs::ClosesAt).big_integer().null())
                    .col(ColumnDef::new(CareerJobs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(CareerJobs::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CareerJobs::Table, CareerJobs::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 职位申请表 ====================
        manager
            .create_table(
                Table::create()
                    .table(CareerApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CareerApplications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CareerApplications::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareerApplications::JobId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CareerApplications::Name).string().not_null())
                    .col(ColumnDef::new(CareerApplications::Email).string().not_null())
                    .col(ColumnDef::new(CareerApplications::Phone).string().null())
                    .col(ColumnDef::new(CareerApplications::CoverLetter).text().null())
                    .col(ColumnDef::new(CareerApplications::ResumeUrl).string().null())
                    .col(
                        ColumnDef::new(CareerApplications::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareerApplications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CareerApplications::Table, CareerApplications::JobId)
                            .to(CareerJobs::Table, CareerJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inquiries_school_status")
                    .table(Inquiries::Table)
                    .col(Inquiries::SchoolId)
                    .col(Inquiries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_career_jobs_school_slug")
                    .table(CareerJobs::Table)
                    .col(CareerJobs::SchoolId)
                    .col(CareerJobs::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_career_applications_job")
                    .table(CareerApplications::Table)
                    .col(CareerApplications::JobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CareerApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CareerJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdmissionLeads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inquiries::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Inquiries {
    #[sea_orm(iden = "inquiries")]
    Table,
    Id,
    SchoolId,
    Name,
    Email,
    Message,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdmissionLeads {
    #[sea_orm(iden = "admission_leads")]
    Table,
    Id,
    SchoolId,
    ResumeToken,
    Step,
    Status,
    GuardianName,
    GuardianEmail,
    GuardianPhone,
    StudentName,
    StudentBirthDate,
    GradeApplying,
    Notes,
    CreatedAt,
    UpdatedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum CareerJobs {
    #[sea_orm(iden = "career_jobs")]
    Table,
    Id,
    SchoolId,
    Title,
    Slug,
    Department,
    Location,
    EmploymentType,
    Description,
    Published,
    ClosesAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CareerApplications {
    #[sea_orm(iden = "career_applications")]
    Table,
    Id,
    SchoolId,
    JobId,
    Name,
    Email,
    Phone,
    CoverLetter,
    ResumeUrl,
    Status,
    CreatedAt,
}
