//! 后台接口 `/api/admin/*`
//!
//! AccessGate 已保证后台角色（admin、staff、finance），
//! 各模块再按职能用 RequireRole 收紧。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    admissions::requests::LeadListParams,
    careers::requests::{SaveJobRequest, UpdateApplicationStatusRequest},
    directory::requests::{CreateGuardianRequest, CreateStudentRequest, StudentListParams},
    exams::requests::CreateExamRequest,
    finance::requests::{CreateInvoiceRequest, InvoiceListParams, RecordPaymentRequest},
    inquiries::requests::{InquiryListParams, UpdateInquiryStatusRequest},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::services::{
    AdmissionService, CareerService, DashboardService, DirectoryService, ExamService,
    FinanceService, InquiryService,
};
use crate::utils::SafeIDI64;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);
static INQUIRY_SERVICE: Lazy<InquiryService> = Lazy::new(InquiryService::new_lazy);
static ADMISSION_SERVICE: Lazy<AdmissionService> = Lazy::new(AdmissionService::new_lazy);
static CAREER_SERVICE: Lazy<CareerService> = Lazy::new(CareerService::new_lazy);
static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);
static DIRECTORY_SERVICE: Lazy<DirectoryService> = Lazy::new(DirectoryService::new_lazy);
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.admin_dashboard(&req).await
}

// 咨询
pub async fn list_inquiries(
    req: HttpRequest,
    query: web::Query<InquiryListParams>,
) -> ActixResult<HttpResponse> {
    INQUIRY_SERVICE.list_inquiries(&req, query.into_inner()).await
}

pub async fn update_inquiry_status(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateInquiryStatusRequest>,
) -> ActixResult<HttpResponse> {
    INQUIRY_SERVICE
        .update_status(&req, id.0, data.into_inner())
        .await
}

// 入学申请
pub async fn list_leads(
    req: HttpRequest,
    query: web::Query<LeadListParams>,
) -> ActixResult<HttpResponse> {
    ADMISSION_SERVICE.list_leads(&req, query.into_inner()).await
}

// 招聘
pub async fn save_job(
    req: HttpRequest,
    data: web::Json<SaveJobRequest>,
) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.save_job(&req, data.into_inner()).await
}

pub async fn list_jobs(req: HttpRequest) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.list_jobs(&req).await
}

pub async fn delete_job(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.delete_job(&req, id.0).await
}

pub async fn list_applications(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.list_applications(&req, id.0).await
}

pub async fn update_application_status(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateApplicationStatusRequest>,
) -> ActixResult<HttpResponse> {
    CAREER_SERVICE
        .update_application_status(&req, id.0, data.into_inner())
        .await
}

// 财务
pub async fn list_invoices(
    req: HttpRequest,
    query: web::Query<InvoiceListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_invoices(&req, query.into_inner()).await
}

pub async fn create_invoice(
    req: HttpRequest,
    data: web::Json<CreateInvoiceRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_invoice(&req, data.into_inner()).await
}

pub async fn record_payment(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .record_payment(&req, id.0, data.into_inner())
        .await
}

pub async fn void_invoice(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.void_invoice(&req, id.0).await
}

// 学籍目录
pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    DIRECTORY_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTORY_SERVICE.create_student(&req, data.into_inner()).await
}

pub async fn create_guardian(
    req: HttpRequest,
    data: web::Json<CreateGuardianRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTORY_SERVICE.create_guardian(&req, data.into_inner()).await
}

pub async fn create_user(
    req: HttpRequest,
    data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    DIRECTORY_SERVICE.create_user(&req, data.into_inner()).await
}

// 考试
pub async fn list_exams(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req).await
}

pub async fn create_exam(
    req: HttpRequest,
    data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(&req, data.into_inner()).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .route("/dashboard", web::get().to(dashboard))
            .service(
                web::scope("/inquiries")
                    .wrap(middlewares::RequireRole::new_any(UserRole::careers_roles()))
                    .route("", web::get().to(list_inquiries))
                    .route("/{id}/status", web::post().to(update_inquiry_status)),
            )
            .service(
                web::scope("/admissions")
                    .wrap(middlewares::RequireRole::new_any(UserRole::careers_roles()))
                    .route("", web::get().to(list_leads)),
            )
            .service(
                web::scope("/careers")
                    .wrap(middlewares::RequireRole::new_any(UserRole::careers_roles()))
                    .route("", web::get().to(list_jobs))
                    .route("/save", web::post().to(save_job))
                    .route(
                        "/applications/{id}/status",
                        web::post().to(update_application_status),
                    )
                    .route("/{id}", web::delete().to(delete_job))
                    .route("/{id}/applications", web::get().to(list_applications)),
            )
            .service(
                web::scope("/finance")
                    .wrap(middlewares::RequireRole::new_any(UserRole::finance_roles()))
                    .route("/invoices", web::get().to(list_invoices))
                    .route("/invoices", web::post().to(create_invoice))
                    .route("/invoices/{id}/payments", web::post().to(record_payment))
                    .route("/invoices/{id}/void", web::post().to(void_invoice)),
            )
            .service(
                web::scope("/exams")
                    .wrap(middlewares::RequireRole::new_any(UserRole::careers_roles()))
                    .route("", web::get().to(list_exams))
                    .route("", web::post().to(create_exam)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::directory_roles()))
                    .route("/students", web::get().to(list_students))
                    .route("/students", web::post().to(create_student))
                    .route("/guardians", web::post().to(create_guardian))
                    .route("/users", web::post().to(create_user)),
            ),
    );
}
