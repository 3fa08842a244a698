use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CareerService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::tenancy;

pub async fn delete_job(
    service: &CareerService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage.delete_job(session.school_id(), id).await {
        Ok(true) => {
            info!("Job {} deleted by user {}", id, session.user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Job deleted")))
        }
        Ok(false) => Ok(tenancy::not_found(ErrorCode::JobNotFound, "Job not found")),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to delete job",
            ErrorCode::JobInvalid,
            e,
        )),
    }
}
