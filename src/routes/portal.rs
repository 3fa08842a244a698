//! 家长/学生门户 `/portal/*`
//!
//! AccessGate 放行后请求扩展中带有 SessionUser 及其门户身份。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::exams::requests::{
    AttemptQuery, LockAttemptRequest, SaveAnswerRequest, StartExamRequest, SubmitAttemptRequest,
};
use crate::services::{DashboardService, ExamService, FinanceService};

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);
static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.portal_dashboard(&req).await
}

pub async fn invoices(req: HttpRequest) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.portal_invoices(&req).await
}

pub async fn list_exams(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_student_exams(&req).await
}

pub async fn start_exam(
    req: HttpRequest,
    data: web::Json<StartExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.start_attempt(&req, data.into_inner()).await
}

pub async fn get_attempt(
    req: HttpRequest,
    query: web::Query<AttemptQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_attempt(&req, query.into_inner()).await
}

pub async fn save_answer(
    req: HttpRequest,
    data: web::Json<SaveAnswerRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.save_answer(&req, data.into_inner()).await
}

pub async fn lock_attempt(
    req: HttpRequest,
    data: web::Json<LockAttemptRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.lock_attempt(&req, data.into_inner()).await
}

pub async fn submit_attempt(
    req: HttpRequest,
    data: web::Json<SubmitAttemptRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.submit_attempt(&req, data.into_inner()).await
}

// 配置路由
pub fn configure_portal_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/portal")
            .route("/dashboard", web::get().to(dashboard))
            .route("/finance/invoices", web::get().to(invoices))
            .service(
                web::scope("/exams")
                    .route("/list", web::get().to(list_exams))
                    .route("/start", web::post().to(start_exam))
                    .route("/attempt", web::get().to(get_attempt))
                    .route("/answer", web::post().to(save_answer))
                    .route("/lock", web::post().to(lock_attempt))
                    .route("/submit", web::post().to(submit_attempt)),
            ),
    );
}
