//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admissions;
mod careers;
mod dashboards;
mod directory;
mod exams;
mod finance;
mod inquiries;
mod schools;
mod users;

use crate::config::AppConfig;
use crate::errors::{CampusError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 单连接的内存 SQLite，测试使用
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CampusError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            // 内存库随最后一个连接关闭而消失
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CampusError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写入错误映射：唯一约束冲突转为 Conflict
pub(crate) fn write_error(context: &str, err: DbErr) -> CampusError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            CampusError::conflict(format!("{context}: 记录已存在"))
        }
        _ => CampusError::database_operation(format!("{context}: {err}")),
    }
}

/// 查询错误映射
pub(crate) fn query_error(context: &str, err: DbErr) -> CampusError {
    CampusError::database_operation(format!("{context}: {err}"))
}

// Storage trait 实现
use crate::models::{
    admissions::{
        entities::AdmissionLead,
        requests::{LeadChanges, LeadListQuery, StartApplicationRequest},
        responses::LeadListResponse,
    },
    careers::{
        entities::{ApplicationStatus, CareerApplication, CareerJob},
        requests::{ApplyJobRequest, JobDraft},
    },
    dashboards::responses::AdminDashboard,
    directory::{
        entities::{Guardian, School, Student},
        requests::{CreateGuardianRequest, CreateStudentRequest, StudentListQuery},
        responses::{GuardianResponse, StudentListResponse},
    },
    exams::{
        entities::{
            AnswerOutcome, AttemptEvent, Exam, ExamAnswer, ExamAttempt, ExamQuestion,
            TransitionOutcome,
        },
        requests::{AttemptListParams, CreateExamRequest},
        responses::ExamDetailResponse,
    },
    finance::{
        entities::{Invoice, InvoiceBalance, InvoicePayment},
        requests::{CreateInvoiceRequest, RecordPaymentRequest},
    },
    inquiries::{
        entities::{Inquiry, InquiryStatus},
        requests::{CreateInquiryRequest, InquiryListQuery},
        responses::InquiryListResponse,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学校模块
    async fn get_school_by_slug(&self, slug: &str) -> Result<Option<School>> {
        self.get_school_by_slug_impl(slug).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn ensure_school(&self, slug: &str, name: &str) -> Result<School> {
        self.ensure_school_impl(slug, name).await
    }

    // 用户模块
    async fn create_user(&self, school_id: i64, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(school_id, user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, school_id: i64, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(school_id, email).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self, school_id: i64) -> Result<u64> {
        self.count_users_impl(school_id).await
    }

    // 学籍目录模块
    async fn create_student(&self, school_id: i64, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(school_id, req).await
    }

    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        self.get_student_impl(school_id, id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(school_id, query)
            .await
    }

    async fn create_guardian(
        &self,
        school_id: i64,
        req: CreateGuardianRequest,
    ) -> Result<GuardianResponse> {
        self.create_guardian_impl(school_id, req).await
    }

    async fn get_guardian(&self, school_id: i64, id: i64) -> Result<Option<Guardian>> {
        self.get_guardian_impl(school_id, id).await
    }

    async fn get_guardian_by_user_id(&self, user_id: i64) -> Result<Option<Guardian>> {
        self.get_guardian_by_user_id_impl(user_id).await
    }

    async fn list_guardian_students(&self, guardian_id: i64) -> Result<Vec<Student>> {
        self.list_guardian_students_impl(guardian_id).await
    }

    // 咨询模块
    async fn create_inquiry(&self, school_id: i64, req: CreateInquiryRequest) -> Result<Inquiry> {
        self.create_inquiry_impl(school_id, req).await
    }

    async fn list_inquiries_with_pagination(
        &self,
        school_id: i64,
        query: InquiryListQuery,
    ) -> Result<InquiryListResponse> {
        self.list_inquiries_with_pagination_impl(school_id, query)
            .await
    }

    async fn update_inquiry_status(
        &self,
        school_id: i64,
        id: i64,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>> {
        self.update_inquiry_status_impl(school_id, id, status).await
    }

    // 入学申请模块
    async fn create_lead(
        &self,
        school_id: i64,
        resume_token: &str,
        req: StartApplicationRequest,
    ) -> Result<AdmissionLead> {
        self.create_lead_impl(school_id, resume_token, req).await
    }

    async fn get_lead_by_token(
        &self,
        school_id: i64,
        resume_token: &str,
    ) -> Result<Option<AdmissionLead>> {
        self.get_lead_by_token_impl(school_id, resume_token).await
    }

    async fn update_lead(&self, id: i64, changes: LeadChanges) -> Result<AdmissionLead> {
        self.update_lead_impl(id, changes).await
    }

    async fn list_leads_with_pagination(
        &self,
        school_id: i64,
        query: LeadListQuery,
    ) -> Result<LeadListResponse> {
        self.list_leads_with_pagination_impl(school_id, query).await
    }

    // 招聘模块
    async fn create_job(&self, school_id: i64, draft: JobDraft) -> Result<CareerJob> {
        self.create_job_impl(school_id, draft).await
    }

    async fn update_job(
        &self,
        school_id: i64,
        id: i64,
        draft: JobDraft,
    ) -> Result<Option<CareerJob>> {
        self.update_job_impl(school_id, id, draft).await
    }

    async fn get_job(&self, school_id: i64, id: i64) -> Result<Option<CareerJob>> {
        self.get_job_impl(school_id, id).await
    }

    async fn get_job_by_slug(&self, school_id: i64, slug: &str) -> Result<Option<CareerJob>> {
        self.get_job_by_slug_impl(school_id, slug).await
    }

    async fn list_jobs(&self, school_id: i64, only_open: bool) -> Result<Vec<CareerJob>> {
        self.list_jobs_impl(school_id, only_open).await
    }

    async fn delete_job(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_job_impl(school_id, id).await
    }

    async fn create_application(
        &self,
        school_id: i64,
        job_id: i64,
        req: ApplyJobRequest,
    ) -> Result<CareerApplication> {
        self.create_application_impl(school_id, job_id, req).await
    }

    async fn list_applications(&self, job_id: i64) -> Result<Vec<CareerApplication>> {
        self.list_applications_impl(job_id).await
    }

    async fn update_application_status(
        &self,
        school_id: i64,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<CareerApplication>> {
        self.update_application_status_impl(school_id, id, status)
            .await
    }

    // 财务模块
    async fn create_invoice(&self, school_id: i64, req: CreateInvoiceRequest) -> Result<Invoice> {
        self.create_invoice_impl(school_id, req).await
    }

    async fn get_invoice_balance(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<InvoiceBalance>> {
        self.get_invoice_balance_impl(school_id, id).await
    }

    async fn list_invoice_balances(
        &self,
        school_id: i64,
        student_ids: Option<Vec<i64>>,
    ) -> Result<Vec<InvoiceBalance>> {
        self.list_invoice_balances_impl(school_id, student_ids)
            .await
    }

    async fn record_payment(
        &self,
        school_id: i64,
        invoice_id: i64,
        req: RecordPaymentRequest,
        recorded_by: Option<i64>,
    ) -> Result<(InvoicePayment, InvoiceBalance)> {
        self.record_payment_impl(school_id, invoice_id, req, recorded_by)
            .await
    }

    async fn void_invoice(&self, school_id: i64, id: i64) -> Result<Option<InvoiceBalance>> {
        self.void_invoice_impl(school_id, id).await
    }

    // 考试模块
    async fn create_exam(
        &self,
        school_id: i64,
        req: CreateExamRequest,
    ) -> Result<ExamDetailResponse> {
        self.create_exam_impl(school_id, req).await
    }

    async fn list_exams(&self, school_id: i64) -> Result<Vec<Exam>> {
        self.list_exams_impl(school_id).await
    }

    async fn get_exam(&self, school_id: i64, id: i64) -> Result<Option<Exam>> {
        self.get_exam_impl(school_id, id).await
    }

    async fn list_exam_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestion>> {
        self.list_exam_questions_impl(exam_id).await
    }

    async fn list_student_exams(&self, school_id: i64, grade_level: i32) -> Result<Vec<Exam>> {
        self.list_student_exams_impl(school_id, grade_level).await
    }

    async fn list_student_attempts(&self, student_id: i64) -> Result<Vec<ExamAttempt>> {
        self.list_student_attempts_impl(student_id).await
    }

    async fn start_exam_attempt(&self, exam: &Exam, student_id: i64) -> Result<ExamAttempt> {
        self.start_exam_attempt_impl(exam, student_id).await
    }

    async fn get_attempt(&self, school_id: i64, id: i64) -> Result<Option<ExamAttempt>> {
        self.get_attempt_impl(school_id, id).await
    }

    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<ExamAnswer>> {
        self.list_attempt_answers_impl(attempt_id).await
    }

    async fn save_answer(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: &str,
    ) -> Result<AnswerOutcome> {
        self.save_answer_impl(attempt_id, question_id, answer).await
    }

    async fn lock_exam_attempt(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome> {
        self.lock_exam_attempt_impl(attempt_id, actor_user_id, reason)
            .await
    }

    async fn submit_exam_attempt(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
    ) -> Result<TransitionOutcome> {
        self.submit_exam_attempt_impl(attempt_id, actor_user_id)
            .await
    }

    async fn unlock_exam_attempt(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome> {
        self.unlock_exam_attempt_impl(attempt_id, actor_user_id, reason)
            .await
    }

    async fn list_attempts(
        &self,
        school_id: i64,
        params: AttemptListParams,
    ) -> Result<Vec<ExamAttempt>> {
        self.list_attempts_impl(school_id, params).await
    }

    async fn list_attempt_events(&self, attempt_id: i64) -> Result<Vec<AttemptEvent>> {
        self.list_attempt_events_impl(attempt_id).await
    }

    // 仪表盘模块
    async fn admin_dashboard(&self, school_id: i64) -> Result<AdminDashboard> {
        self.admin_dashboard_impl(school_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("campus.db").unwrap(),
            "sqlite://campus.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[actix_web::test]
    async fn test_memory_storage_runs_migrations() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        let again = storage.ensure_school_impl("main", "Other").await.unwrap();
        assert_eq!(school.id, again.id);
        assert_eq!(again.name, "Main");
    }
}
