use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::error;

use super::DashboardService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::entities::PortalSubject,
    dashboards::responses::{
        ChildSummary, GuardianDashboard, PortalDashboard, PortalDashboardKind, StudentDashboard,
    },
    finance::entities::InvoiceBalance,
};
use crate::services::tenancy;
use crate::utils::labels::join_names;

/// 按学生汇总未结清金额
fn outstanding_by_student(balances: &[InvoiceBalance]) -> HashMap<i64, i64> {
    let mut totals = HashMap::new();
    for balance in balances {
        *totals.entry(balance.invoice.student_id).or_insert(0) += balance.outstanding_cents();
    }
    totals
}

pub async fn portal_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let Some(subject) = session.subject.as_ref() else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "No portal profile linked to this account",
        )));
    };
    let storage = service.get_storage(request);
    let school_id = session.school_id();

    let balances = match storage
        .list_invoice_balances(school_id, Some(subject.student_ids()))
        .await
    {
        Ok(balances) => balances,
        Err(e) => {
            error!("Failed to load balances for user {}: {}", session.user.id, e);
            return Ok(tenancy::internal_error("Failed to build dashboard"));
        }
    };
    let outstanding = outstanding_by_student(&balances);

    let dashboard = match subject {
        PortalSubject::Guardian { guardian, students } => {
            let children: Vec<ChildSummary> = students
                .iter()
                .map(|student| ChildSummary {
                    label: student.display_label(),
                    outstanding_cents: outstanding.get(&student.id).copied().unwrap_or(0),
                    student: student.clone(),
                })
                .collect();
            let first_names: Vec<&str> =
                students.iter().map(|s| s.first_name.as_str()).collect();

            PortalDashboard {
                kind: PortalDashboardKind::Guardian,
                guardian: Some(GuardianDashboard {
                    guardian_name: guardian.full_name.clone(),
                    outstanding_cents: children.iter().map(|c| c.outstanding_cents).sum(),
                    children_label: join_names(&first_names),
                    children,
                }),
                student: None,
            }
        }
        PortalSubject::Student(student) => {
            let now = chrono::Utc::now();
            let exams = match storage.list_student_exams(school_id, student.grade_level).await {
                Ok(exams) => exams,
                Err(e) => {
                    error!("Failed to load exams for student {}: {}", student.id, e);
                    return Ok(tenancy::internal_error("Failed to build dashboard"));
                }
            };
            let attempts = match storage.list_student_attempts(student.id).await {
                Ok(attempts) => attempts,
                Err(e) => {
                    error!("Failed to load attempts for student {}: {}", student.id, e);
                    return Ok(tenancy::internal_error("Failed to build dashboard"));
                }
            };

            PortalDashboard {
                kind: PortalDashboardKind::Student,
                guardian: None,
                student: Some(StudentDashboard {
                    label: student.display_label(),
                    upcoming_exams: exams.into_iter().filter(|e| e.closes_at > now).collect(),
                    attempts,
                    outstanding_cents: outstanding.get(&student.id).copied().unwrap_or(0),
                    student: student.clone(),
                }),
            }
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        dashboard,
        "Dashboard retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Area;
    use crate::models::directory::requests::{CreateGuardianRequest, CreateStudentRequest};
    use crate::models::finance::requests::CreateInvoiceRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{fake_user, read_json, session_request};
    use crate::storage::create_memory_storage;

    #[actix_web::test]
    async fn test_guardian_dashboard_lists_children() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let mut students = Vec::new();
        for (first, no) in [("Ada", "A-1"), ("Ben", "B-1"), ("Cy", "C-1")] {
            students.push(
                storage
                    .create_student(
                        school.id,
                        CreateStudentRequest {
                            first_name: first.into(),
                            last_name: "Lovelace".into(),
                            grade_level: 5,
                            admission_no: no.into(),
                        },
                    )
                    .await
                    .unwrap(),
            );
        }
        let guardian = storage
            .create_guardian(
                school.id,
                CreateGuardianRequest {
                    full_name: "Anne Lovelace".into(),
                    email: None,
                    phone: None,
                    student_ids: students.iter().map(|s| s.id).collect(),
                    relationship: Some("mother".into()),
                },
            )
            .await
            .unwrap();
        storage
            .create_invoice(
                school.id,
                CreateInvoiceRequest {
                    student_id: students[1].id,
                    number: "INV-1".into(),
                    description: "Term fees".into(),
                    amount_cents: 12_500,
                    currency: "USD".into(),
                    due_date: chrono::Utc::now().date_naive() + chrono::Duration::days(30),
                },
            )
            .await
            .unwrap();

        let req = session_request(
            &storage,
            fake_user(school.id, UserRole::Guardian),
            Area::Portal,
            Some(PortalSubject::Guardian {
                guardian: guardian.guardian,
                students,
            }),
        );
        let body = read_json(
            DashboardService::new_lazy()
                .portal_dashboard(&req)
                .await
                .unwrap(),
        )
        .await;

        let data = &body["data"];
        assert_eq!(data["kind"], "guardian");
        assert_eq!(data["guardian"]["children_label"], "Ada, Ben and Cy");
        assert_eq!(data["guardian"]["outstanding_cents"], 12_500);
        assert_eq!(
            data["guardian"]["children"][0]["label"],
            "Ada Lovelace · Grade 5"
        );
        assert_eq!(data["guardian"]["children"][1]["outstanding_cents"], 12_500);
    }
}
