use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InquiryService;
use crate::models::{
    ApiResponse, ErrorCode,
    inquiries::requests::{InquiryListParams, InquiryListQuery},
};
use crate::services::tenancy;

pub async fn list_inquiries(
    service: &InquiryService,
    request: &HttpRequest,
    query: InquiryListParams,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage
        .list_inquiries_with_pagination(session.school_id(), InquiryListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Inquiries retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve inquiries",
            ErrorCode::InquiryInvalid,
            e,
        )),
    }
}
