use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::InquiryService;
use crate::models::{ApiResponse, ErrorCode, inquiries::requests::UpdateInquiryStatusRequest};
use crate::services::tenancy;

pub async fn update_status(
    service: &InquiryService,
    request: &HttpRequest,
    id: i64,
    req: UpdateInquiryStatusRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage
        .update_inquiry_status(session.school_id(), id, req.status)
        .await
    {
        Ok(Some(inquiry)) => {
            info!(
                "Inquiry {} marked {} by user {}",
                inquiry.id, inquiry.status, session.user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(inquiry, "Inquiry updated")))
        }
        Ok(None) => Ok(tenancy::not_found(
            ErrorCode::InquiryNotFound,
            "Inquiry not found",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to update inquiry",
            ErrorCode::InquiryInvalid,
            e,
        )),
    }
}
