use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinanceService;
use crate::errors::CampusError;
use crate::models::{
    ApiResponse, ErrorCode,
    finance::{requests::RecordPaymentRequest, responses::PaymentResponse},
};
use crate::services::tenancy;
use crate::utils::validate::{normalize_optional, validate_length};

pub async fn record_payment(
    service: &FinanceService,
    request: &HttpRequest,
    invoice_id: i64,
    req: RecordPaymentRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };

    if req.amount_cents <= 0 {
        return Ok(tenancy::bad_request(
            ErrorCode::PaymentInvalid,
            "Amount must be greater than 0",
        ));
    }
    let method = req.method.trim().to_string();
    if let Err(msg) = validate_length("Method", &method, 1, 40) {
        return Ok(tenancy::bad_request(ErrorCode::PaymentInvalid, msg));
    }
    let payment = RecordPaymentRequest {
        method,
        reference: normalize_optional(req.reference),
        ..req
    };

    let storage = service.get_storage(request);
    match storage
        .record_payment(
            session.school_id(),
            invoice_id,
            payment,
            Some(session.user.id),
        )
        .await
    {
        Ok((payment, balance)) => {
            info!(
                "Payment of {} cents recorded on invoice {} by user {}",
                payment.amount_cents, invoice_id, session.user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                PaymentResponse { payment, balance },
                "Payment recorded",
            )))
        }
        Err(CampusError::Conflict(_)) => Ok(tenancy::conflict(
            ErrorCode::InvoiceVoid,
            "Invoice is void",
        )),
        Err(CampusError::NotFound(_)) => Ok(tenancy::not_found(
            ErrorCode::InvoiceNotFound,
            "Invoice not found",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to record payment",
            ErrorCode::PaymentInvalid,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Area;
    use crate::models::directory::requests::CreateStudentRequest;
    use crate::models::finance::requests::CreateInvoiceRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::services::test_support::{read_json, session_request};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;

    fn pay(amount_cents: i64) -> RecordPaymentRequest {
        RecordPaymentRequest {
            amount_cents,
            method: "cash".to_string(),
            reference: None,
            paid_at: None,
        }
    }

    #[actix_web::test]
    async fn test_partial_then_paid_and_overpayment_rejected() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let student = storage
            .create_student(
                school.id,
                CreateStudentRequest {
                    first_name: "Ada".into(),
                    last_name: "L".into(),
                    grade_level: 3,
                    admission_no: "A-1".into(),
                },
            )
            .await
            .unwrap();
        let invoice = storage
            .create_invoice(
                school.id,
                CreateInvoiceRequest {
                    student_id: student.id,
                    number: "INV-1".into(),
                    description: "Tuition".into(),
                    amount_cents: 10_000,
                    currency: "USD".into(),
                    due_date: NaiveDate::from_ymd_opt(2099, 6, 30).unwrap(),
                },
            )
            .await
            .unwrap();
        // 付款记录引用 users.id，会话用户必须真实存在
        let clerk = storage
            .create_user(
                school.id,
                CreateUserRequest {
                    email: "clerk@example.com".into(),
                    password: "not-used".into(),
                    role: UserRole::Finance,
                    display_name: Some("Clerk".into()),
                    student_id: None,
                    guardian_id: None,
                },
            )
            .await
            .unwrap();
        let service = FinanceService::new_lazy();
        let req = session_request(&storage, clerk.clone(), Area::Admin, None);

        let res = service.record_payment(&req, invoice.id, pay(4_000)).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = read_json(res).await;
        assert_eq!(body["data"]["balance"]["balance_status"], "partial");
        assert_eq!(body["data"]["balance"]["balance_cents"], 6_000);
        assert_eq!(body["data"]["payment"]["recorded_by"], clerk.id);

        let res = service.record_payment(&req, invoice.id, pay(7_000)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = service.record_payment(&req, invoice.id, pay(0)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = service.record_payment(&req, invoice.id, pay(6_000)).await.unwrap();
        let body = read_json(res).await;
        assert_eq!(body["data"]["balance"]["balance_status"], "paid");

        let res = service.record_payment(&req, invoice.id + 99, pay(1)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
