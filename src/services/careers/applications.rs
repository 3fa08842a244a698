use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CareerService;
use crate::models::{
    ApiResponse, ErrorCode,
    careers::{requests::UpdateApplicationStatusRequest, responses::ApplicationListResponse},
};
use crate::services::tenancy;

pub async fn list_applications(
    service: &CareerService,
    request: &HttpRequest,
    job_id: i64,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    // 先确认职位属于当前学校
    let job = match storage.get_job(session.school_id(), job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => return Ok(tenancy::not_found(ErrorCode::JobNotFound, "Job not found")),
        Err(e) => {
            return Ok(tenancy::storage_error(
                "Failed to retrieve job",
                ErrorCode::JobInvalid,
                e,
            ));
        }
    };

    match storage.list_applications(job.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ApplicationListResponse { job, items },
            "Applications retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve applications",
            ErrorCode::ApplicationInvalid,
            e,
        )),
    }
}

pub async fn update_application_status(
    service: &CareerService,
    request: &HttpRequest,
    id: i64,
    req: UpdateApplicationStatusRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage
        .update_application_status(session.school_id(), id, req.status)
        .await
    {
        Ok(Some(application)) => {
            info!(
                "Application {} moved to {} by user {}",
                application.id, application.status, session.user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                application,
                "Application updated",
            )))
        }
        Ok(None) => Ok(tenancy::not_found(
            ErrorCode::ApplicationNotFound,
            "Application not found",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to update application",
            ErrorCode::ApplicationInvalid,
            e,
        )),
    }
}
