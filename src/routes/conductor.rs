//! 监考台 `/conductor/*`

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::exams::requests::{AttemptListParams, UnlockAttemptRequest};
use crate::services::ExamService;
use crate::utils::SafeIDI64;

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn list_attempts(
    req: HttpRequest,
    query: web::Query<AttemptListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_attempts(&req, query.into_inner()).await
}

pub async fn unlock_attempt(
    req: HttpRequest,
    data: web::Json<UnlockAttemptRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.unlock_attempt(&req, data.into_inner()).await
}

pub async fn list_events(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_attempt_events(&req, id.0).await
}

// 配置路由
pub fn configure_conductor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conductor/attempts")
            .route("", web::get().to(list_attempts))
            .route("/unlock", web::post().to(unlock_attempt))
            .route("/{id}/events", web::get().to(list_events)),
    );
}
