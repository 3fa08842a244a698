use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 所有查询都按 school_id（租户）隔离，调用方负责传入当前租户
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学校（租户）
    // 通过 slug 获取学校
    async fn get_school_by_slug(&self, slug: &str) -> Result<Option<School>>;
    // 通过 ID 获取学校
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    // 获取或创建学校
    async fn ensure_school(&self, slug: &str, name: &str) -> Result<School>;

    /// 用户管理方法
    // 创建用户，密码需已哈希；同时关联学生/监护人记录
    async fn create_user(&self, school_id: i64, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, school_id: i64, email: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self, school_id: i64) -> Result<u64>;

    /// 学籍目录
    async fn create_student(&self, school_id: i64, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn create_guardian(
        &self,
        school_id: i64,
        req: CreateGuardianRequest,
    ) -> Result<GuardianResponse>;
    async fn get_guardian(&self, school_id: i64, id: i64) -> Result<Option<Guardian>>;
    async fn get_guardian_by_user_id(&self, user_id: i64) -> Result<Option<Guardian>>;
    // 监护人关联的学生
    async fn list_guardian_students(&self, guardian_id: i64) -> Result<Vec<Student>>;

    /// 咨询留言
    async fn create_inquiry(&self, school_id: i64, req: CreateInquiryRequest) -> Result<Inquiry>;
    async fn list_inquiries_with_pagination(
        &self,
        school_id: i64,
        query: InquiryListQuery,
    ) -> Result<InquiryListResponse>;
    async fn update_inquiry_status(
        &self,
        school_id: i64,
        id: i64,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>>;

    /// 入学申请
    async fn create_lead(
        &self,
        school_id: i64,
        resume_token: &str,
        req: StartApplicationRequest,
    ) -> Result<AdmissionLead>;
    async fn get_lead_by_token(
        &self,
        school_id: i64,
        resume_token: &str,
    ) -> Result<Option<AdmissionLead>>;
    // 只更新草稿状态的线索，已提交返回 Conflict
    async fn update_lead(&self, id: i64, changes: LeadChanges) -> Result<AdmissionLead>;
    async fn list_leads_with_pagination(
        &self,
        school_id: i64,
        query: LeadListQuery,
    ) -> Result<LeadListResponse>;

    /// 招聘
    // slug 重复返回 Conflict
    async fn create_job(&self, school_id: i64, draft: JobDraft) -> Result<CareerJob>;
    async fn update_job(&self, school_id: i64, id: i64, draft: JobDraft)
    -> Result<Option<CareerJob>>;
    async fn get_job(&self, school_id: i64, id: i64) -> Result<Option<CareerJob>>;
    async fn get_job_by_slug(&self, school_id: i64, slug: &str) -> Result<Option<CareerJob>>;
    // only_open 为 true 时只返回已发布且未截止的职位
    async fn list_jobs(&self, school_id: i64, only_open: bool) -> Result<Vec<CareerJob>>;
    async fn delete_job(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn create_application(
        &self,
        school_id: i64,
        job_id: i64,
        req: ApplyJobRequest,
    ) -> Result<CareerApplication>;
    async fn list_applications(&self, job_id: i64) -> Result<Vec<CareerApplication>>;
    async fn update_application_status(
        &self,
        school_id: i64,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<CareerApplication>>;

    /// 财务
    // 编号重复返回 Conflict
    async fn create_invoice(&self, school_id: i64, req: CreateInvoiceRequest) -> Result<Invoice>;
    async fn get_invoice_balance(&self, school_id: i64, id: i64)
    -> Result<Option<InvoiceBalance>>;
    // 账单余额视图，student_ids 为 None 时返回整个学校
    async fn list_invoice_balances(
        &self,
        school_id: i64,
        student_ids: Option<Vec<i64>>,
    ) -> Result<Vec<InvoiceBalance>>;
    // 作废账单返回 Conflict，超出余额返回 Validation
    async fn record_payment(
        &self,
        school_id: i64,
        invoice_id: i64,
        req: RecordPaymentRequest,
        recorded_by: Option<i64>,
    ) -> Result<(InvoicePayment, InvoiceBalance)>;
    async fn void_invoice(&self, school_id: i64, id: i64) -> Result<Option<InvoiceBalance>>;

    /// 考试
    async fn create_exam(&self, school_id: i64, req: CreateExamRequest)
    -> Result<ExamDetailResponse>;
    async fn list_exams(&self, school_id: i64) -> Result<Vec<Exam>>;
    async fn get_exam(&self, school_id: i64, id: i64) -> Result<Option<Exam>>;
    async fn list_exam_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestion>>;
    // 学生可见的考试：已发布且年级匹配
    async fn list_student_exams(&self, school_id: i64, grade_level: i32) -> Result<Vec<Exam>>;
    async fn list_student_attempts(&self, student_id: i64) -> Result<Vec<ExamAttempt>>;
    // 创建或恢复唯一的答题记录
    async fn start_exam_attempt(&self, exam: &Exam, student_id: i64) -> Result<ExamAttempt>;
    async fn get_attempt(&self, school_id: i64, id: i64) -> Result<Option<ExamAttempt>>;
    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<ExamAnswer>>;
    // 在行锁内确认答题记录仍在进行中再写入
    async fn save_answer(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: &str,
    ) -> Result<AnswerOutcome>;
    // in_progress -> locked
    async fn lock_exam_attempt(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome>;
    // in_progress -> submitted，并自动判分
    async fn submit_exam_attempt(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
    ) -> Result<TransitionOutcome>;
    // locked -> in_progress
    async fn unlock_exam_attempt(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome>;
    async fn list_attempts(
        &self,
        school_id: i64,
        params: AttemptListParams,
    ) -> Result<Vec<ExamAttempt>>;
    async fn list_attempt_events(&self, attempt_id: i64) -> Result<Vec<AttemptEvent>>;

    /// 仪表盘
    async fn admin_dashboard(&self, school_id: i64) -> Result<AdminDashboard>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

/// 内存 SQLite 存储，供测试使用
#[cfg(test)]
pub async fn create_memory_storage() -> Arc<dyn Storage> {
    let storage = sea_orm_storage::SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory sqlite");
    Arc::new(storage)
}
