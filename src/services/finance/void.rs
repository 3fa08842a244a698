use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::tenancy;

pub async fn void_invoice(
    service: &FinanceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage.void_invoice(session.school_id(), id).await {
        Ok(Some(balance)) => {
            info!("Invoice {} voided by user {}", id, session.user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(balance, "Invoice voided")))
        }
        Ok(None) => Ok(tenancy::not_found(
            ErrorCode::InvoiceNotFound,
            "Invoice not found",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to void invoice",
            ErrorCode::InvoiceInvalid,
            e,
        )),
    }
}
