use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AdmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    admissions::{
        entities::AdmissionLead, requests::LoadApplicationQuery, responses::ApplicationView,
    },
};
use crate::services::tenancy;
use crate::utils::random_code::is_valid_resume_token;

/// 按令牌查找仍可恢复的线索，失败时给出响应
pub(crate) async fn find_resumable_lead(
    service: &AdmissionService,
    request: &HttpRequest,
    token: &str,
) -> Result<AdmissionLead, HttpResponse> {
    let token = token.trim();
    if !is_valid_resume_token(token) {
        return Err(tenancy::not_found(
            ErrorCode::LeadNotFound,
            "Application not found",
        ));
    }

    let storage = service.get_storage(request);
    let school = tenancy::resolve_school(&storage, request).await?;

    let lead = match storage.get_lead_by_token(school.id, token).await {
        Ok(Some(lead)) => lead,
        Ok(None) => {
            return Err(tenancy::not_found(
                ErrorCode::LeadNotFound,
                "Application not found",
            ));
        }
        Err(e) => {
            error!("Failed to load application: {}", e);
            return Err(tenancy::internal_error("Failed to load application"));
        }
    };

    let ttl_days = service.get_config().admissions.resume_ttl_days;
    if lead.is_expired(chrono::Utc::now(), ttl_days) {
        return Err(tenancy::not_found(
            ErrorCode::LeadExpired,
            "Application has expired",
        ));
    }

    Ok(lead)
}

pub async fn load_application(
    service: &AdmissionService,
    request: &HttpRequest,
    query: LoadApplicationQuery,
) -> ActixResult<HttpResponse> {
    match find_resumable_lead(service, request, &query.token).await {
        Ok(lead) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ApplicationView::from(lead),
            "Application loaded",
        ))),
        Err(res) => Ok(res),
    }
}
