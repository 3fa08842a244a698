use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    admissions::requests::{LeadListParams, LeadListQuery},
};
use crate::services::tenancy;

pub async fn list_leads(
    service: &AdmissionService,
    request: &HttpRequest,
    query: LeadListParams,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage
        .list_leads_with_pagination(session.school_id(), LeadListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Admission leads retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve admission leads",
            ErrorCode::LeadInvalid,
            e,
        )),
    }
}
