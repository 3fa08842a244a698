use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::{ApiResponse, ErrorCode, finance::responses::PortalInvoicesResponse};
use crate::services::tenancy;

pub async fn portal_invoices(
    service: &FinanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let student_ids = session
        .subject
        .as_ref()
        .map(|subject| subject.student_ids())
        .unwrap_or_default();
    let storage = service.get_storage(request);

    match storage
        .list_invoice_balances(session.school_id(), Some(student_ids))
        .await
    {
        Ok(items) => {
            let outstanding_cents = items.iter().map(|b| b.outstanding_cents()).sum();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                PortalInvoicesResponse {
                    items,
                    outstanding_cents,
                },
                "Invoices retrieved successfully",
            )))
        }
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve invoices",
            ErrorCode::InvoiceInvalid,
            e,
        )),
    }
}
