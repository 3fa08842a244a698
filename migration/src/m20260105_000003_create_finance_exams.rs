use sea_orm_migration::prelude::*;

use super::m20260105_000001_create_directory::{Schools, Students, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 账单表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Invoices::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Invoices::Number).string().not_null())
                    .col(ColumnDef::new(Invoices::Description).string().not_null())
                    .col(ColumnDef::new(Invoices::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Invoices::Currency).string().not_null())
                    .col(ColumnDef::new(Invoices::DueDate).string().not_null())
                    .col(ColumnDef::new(Invoices::Status).string().not_null())
                    .col(ColumnDef::new(Invoices::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Invoices::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invoices::Table, Invoices::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invoices::Table, Invoices::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 缴费记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(InvoicePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoicePayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvoicePayments::InvoiceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoicePayments::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoicePayments::Method).string().not_null())
                    .col(ColumnDef::new(InvoicePayments::Reference).string().null())
                    .col(ColumnDef::new(InvoicePayments::PaidAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(InvoicePayments::RecordedBy)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InvoicePayments::Table, InvoicePayments::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InvoicePayments::Table, InvoicePayments::RecordedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考试表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exams::SchoolId).big_integer().not_null())
                    .col(ColumnDef::new(Exams::Title).string().not_null())
                    .col(ColumnDef::new(Exams::GradeLevel).integer().null())
                    .col(ColumnDef::new(Exams::DurationMinutes).integer().not_null())
                    .col(ColumnDef::new(Exams::OpensAt).big_integer().not_null())
                    .col(ColumnDef::new(Exams::ClosesAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(Exams::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Exams::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考题表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExamQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamQuestions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExamQuestions::ExamId).big_integer().not_null())
                    .col(ColumnDef::new(ExamQuestions::Position).integer().not_null())
                    .col(ColumnDef::new(ExamQuestions::Prompt).text().not_null())
                    .col(ColumnDef::new(ExamQuestions::Kind).string().not_null())
                    .col(ColumnDef::new(ExamQuestions::Options).text().null())
                    .col(ColumnDef::new(ExamQuestions::CorrectAnswer).string().null())
                    .col(ColumnDef::new(ExamQuestions::Points).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamQuestions::Table, ExamQuestions::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 答题记录（考试会话）表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExamAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamAttempts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExamAttempts::ExamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamAttempts::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAttempts::Status).string().not_null())
                    .col(
                        ColumnDef::new(ExamAttempts::StartedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamAttempts::DeadlineAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAttempts::LockedAt).big_integer().null())
                    .col(ColumnDef::new(ExamAttempts::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(ExamAttempts::Score).integer().null())
                    .col(ColumnDef::new(ExamAttempts::MaxScore).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAttempts::Table, ExamAttempts::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAttempts::Table, ExamAttempts::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 作答表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExamAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamAnswers::AttemptId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamAnswers::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAnswers::Answer).text().not_null())
                    .col(ColumnDef::new(ExamAnswers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAnswers::Table, ExamAnswers::AttemptId)
                            .to(ExamAttempts::Table, ExamAttempts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAnswers::Table, ExamAnswers::QuestionId)
                            .to(ExamQuestions::Table, ExamQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 考试会话事件表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExamAttemptEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamAttemptEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamAttemptEvents::AttemptId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAttemptEvents::Kind).string().not_null())
                    .col(ColumnDef::new(ExamAttemptEvents::Reason).string().null())
                    .col(
                        ColumnDef::new(ExamAttemptEvents::ActorUserId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExamAttemptEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAttemptEvents::Table, ExamAttemptEvents::AttemptId)
                            .to(ExamAttempts::Table, ExamAttempts::Id)
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
                    .name("idx_invoices_school_number")
                    .table(Invoices::Table)
                    .col(Invoices::SchoolId)
                    .col(Invoices::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invoices_student")
                    .table(Invoices::Table)
                    .col(Invoices::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invoice_payments_invoice")
                    .table(InvoicePayments::Table)
                    .col(InvoicePayments::InvoiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_questions_exam")
                    .table(ExamQuestions::Table)
                    .col(ExamQuestions::ExamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_attempts_exam_student")
                    .table(ExamAttempts::Table)
                    .col(ExamAttempts::ExamId)
                    .col(ExamAttempts::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_answers_attempt_question")
                    .table(ExamAnswers::Table)
                    .col(ExamAnswers::AttemptId)
                    .col(ExamAnswers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_attempt_events_attempt")
                    .table(ExamAttemptEvents::Table)
                    .col(ExamAttemptEvents::AttemptId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExamAttemptEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamAttempts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvoicePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Invoices {
    #[sea_orm(iden = "invoices")]
    Table,
    Id,
    SchoolId,
    StudentId,
    Number,
    Description,
    AmountCents,
    Currency,
    DueDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InvoicePayments {
    #[sea_orm(iden = "invoice_payments")]
    Table,
    Id,
    InvoiceId,
    AmountCents,
    Method,
    Reference,
    PaidAt,
    RecordedBy,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    SchoolId,
    Title,
    GradeLevel,
    DurationMinutes,
    OpensAt,
    ClosesAt,
    Published,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExamQuestions {
    #[sea_orm(iden = "exam_questions")]
    Table,
    Id,
    ExamId,
    Position,
    Prompt,
    Kind,
    Options,
    CorrectAnswer,
    Points,
}

#[derive(DeriveIden)]
enum ExamAttempts {
    #[sea_orm(iden = "exam_attempts")]
    Table,
    Id,
    ExamId,
    StudentId,
    Status,
    StartedAt,
    DeadlineAt,
    LockedAt,
    SubmittedAt,
    Score,
    MaxScore,
}

#[derive(DeriveIden)]
enum ExamAnswers {
    #[sea_orm(iden = "exam_answers")]
    Table,
    Id,
    AttemptId,
    QuestionId,
    Answer,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamAttemptEvents {
    #[sea_orm(iden = "exam_attempt_events")]
    Table,
    Id,
    AttemptId,
    Kind,
    Reason,
    ActorUserId,
    CreatedAt,
}
