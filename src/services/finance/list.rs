use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::{
    ApiResponse, ErrorCode, PaginatedResponse,
    finance::{
        entities::InvoiceBalance,
        requests::{InvoiceListParams, InvoiceListQuery},
    },
};
use crate::services::tenancy;

/// 按余额状态过滤，学生条件已在查询中处理
pub fn filter_balances(balances: Vec<InvoiceBalance>, query: &InvoiceListQuery) -> Vec<InvoiceBalance> {
    balances
        .into_iter()
        .filter(|b| query.status.is_none_or(|s| b.balance_status == s))
        .collect()
}

pub async fn list_invoices(
    service: &FinanceService,
    request: &HttpRequest,
    params: InvoiceListParams,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let (page, size) = params.pagination.normalized();
    let query = InvoiceListQuery::from(params);
    let storage = service.get_storage(request);

    // 余额状态依赖付款汇总与当天日期，在内存中过滤分页
    let student_ids = query.student_id.map(|id| vec![id]);
    match storage
        .list_invoice_balances(session.school_id(), student_ids)
        .await
    {
        Ok(balances) => {
            let filtered = filter_balances(balances, &query);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                PaginatedResponse::from_vec(filtered, page, size),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::auth::entities::Area;
    use crate::models::directory::requests::CreateStudentRequest;
    use crate::models::finance::entities::{BalanceStatus, Invoice, InvoiceStatus};
    use crate::models::finance::requests::CreateInvoiceRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{fake_user, read_json, session_request};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;
    use chrono::{NaiveDate, Utc};

    fn balance(student_id: i64, amount: i64, paid: i64) -> InvoiceBalance {
        let invoice = Invoice {
            id: student_id * 10,
            school_id: 1,
            student_id,
            number: format!("INV-{student_id}"),
            description: "Fees".to_string(),
            amount_cents: amount,
            currency: "USD".to_string(),
            due_date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            status: InvoiceStatus::Issued,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        InvoiceBalance::compute(invoice, paid, Utc::now().date_naive())
    }

    #[test]
    fn test_filter_by_status_and_student() {
        let all = vec![balance(1, 100, 100), balance(2, 100, 40), balance(3, 100, 0)];

        let partial = filter_balances(
            all.clone(),
            &InvoiceListQuery {
                status: Some(BalanceStatus::Partial),
                ..Default::default()
            },
        );
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].invoice.student_id, 2);

        assert_eq!(filter_balances(all, &InvoiceListQuery::default()).len(), 3);
    }

    #[actix_web::test]
    async fn test_list_filters_student_and_survives_huge_page() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let mut students = Vec::new();
        for (i, name) in ["Ada", "Ben"].iter().enumerate() {
            let student = storage
                .create_student(
                    school.id,
                    CreateStudentRequest {
                        first_name: name.to_string(),
                        last_name: "K".into(),
                        grade_level: 2,
                        admission_no: format!("A-{i}"),
                    },
                )
                .await
                .unwrap();
            storage
                .create_invoice(
                    school.id,
                    CreateInvoiceRequest {
                        student_id: student.id,
                        number: format!("INV-{i}"),
                        description: "Tuition".into(),
                        amount_cents: 5_000,
                        currency: "USD".into(),
                        due_date: NaiveDate::from_ymd_opt(2099, 6, 30).unwrap(),
                    },
                )
                .await
                .unwrap();
            students.push(student);
        }
        let service = FinanceService::new_lazy();
        let req = session_request(
            &storage,
            fake_user(school.id, UserRole::Finance),
            Area::Admin,
            None,
        );
        let params = |page: i64, student_id: Option<i64>| InvoiceListParams {
            pagination: PaginationQuery { page, size: 10 },
            status: None,
            student_id,
        };

        let res = service
            .list_invoices(&req, params(1, Some(students[1].id)))
            .await
            .unwrap();
        let body = read_json(res).await;
        assert_eq!(body["data"]["pagination"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["invoice"]["student_id"], students[1].id);

        let res = service.list_invoices(&req, params(i64::MAX, None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = read_json(res).await;
        assert_eq!(body["data"]["pagination"]["total"], 2);
        assert!(body["data"]["items"].as_array().unwrap().is_empty());
    }
}
