use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinanceService;
use crate::errors::CampusError;
use crate::models::{ApiResponse, ErrorCode, finance::requests::CreateInvoiceRequest};
use crate::services::tenancy;
use crate::utils::validate::{validate_currency, validate_length};

pub fn validate_invoice(req: CreateInvoiceRequest) -> Result<CreateInvoiceRequest, String> {
    let number = req.number.trim().to_string();
    validate_length("Invoice number", &number, 1, 40)?;
    let description = req.description.trim().to_string();
    validate_length("Description", &description, 1, 500)?;
    if req.amount_cents <= 0 {
        return Err("Amount must be greater than 0".to_string());
    }
    let currency = req.currency.trim().to_string();
    validate_currency(&currency).map_err(str::to_string)?;

    Ok(CreateInvoiceRequest {
        number,
        description,
        currency,
        ..req
    })
}

pub async fn create_invoice(
    service: &FinanceService,
    request: &HttpRequest,
    req: CreateInvoiceRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let invoice = match validate_invoice(req) {
        Ok(invoice) => invoice,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::InvoiceInvalid, msg)),
    };

    let storage = service.get_storage(request);
    match storage.create_invoice(session.school_id(), invoice).await {
        Ok(created) => {
            info!(
                "Invoice {} issued to student {} by user {}",
                created.number, created.student_id, session.user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Invoice created")))
        }
        Err(CampusError::Conflict(_)) => Ok(tenancy::conflict(
            ErrorCode::InvoiceNumberTaken,
            "Invoice number already exists",
        )),
        Err(CampusError::NotFound(_)) => Ok(tenancy::not_found(
            ErrorCode::StudentNotFound,
            "Student not found",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to create invoice",
            ErrorCode::InvoiceInvalid,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invoice(amount_cents: i64, currency: &str) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            student_id: 1,
            number: " INV-001 ".to_string(),
            description: "Term 1 tuition".to_string(),
            amount_cents,
            currency: currency.to_string(),
            due_date: NaiveDate::from_ymd_opt(2030, 1, 31).unwrap(),
        }
    }

    #[test]
    fn test_invoice_validation() {
        let ok = validate_invoice(invoice(120_00, "USD")).unwrap();
        assert_eq!(ok.number, "INV-001");
        assert!(validate_invoice(invoice(0, "USD")).is_err());
        assert!(validate_invoice(invoice(-5, "USD")).is_err());
        assert!(validate_invoice(invoice(100, "usd")).is_err());
        assert!(validate_invoice(invoice(100, "US")).is_err());
    }
}
