use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::error;

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        requests::StartExamRequest,
        responses::{AttemptResponse, StudentExamItem, StudentExamListResponse},
    },
};
use crate::services::tenancy;

pub async fn list_student_exams(
    service: &ExamService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (session, student) = match service.session_student(request) {
        Ok(pair) => pair,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    let exams = match storage
        .list_student_exams(session.school_id(), student.grade_level)
        .await
    {
        Ok(exams) => exams,
        Err(e) => {
            error!("Failed to list exams for student {}: {}", student.id, e);
            return Ok(tenancy::internal_error("Failed to retrieve exams"));
        }
    };
    let attempts = match storage.list_student_attempts(student.id).await {
        Ok(attempts) => attempts,
        Err(e) => {
            error!("Failed to list attempts for student {}: {}", student.id, e);
            return Ok(tenancy::internal_error("Failed to retrieve exams"));
        }
    };

    let by_exam: HashMap<i64, _> = attempts.into_iter().map(|a| (a.exam_id, a)).collect();
    let now = chrono::Utc::now();
    let items = exams
        .into_iter()
        .map(|exam| {
            let attempt = by_exam.get(&exam.id);
            StudentExamItem {
                attempt_id: attempt.map(|a| a.id),
                attempt_status: attempt.map(|a| a.status),
                is_open: exam.is_open_at(now),
                exam,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentExamListResponse { items },
        "Exams retrieved successfully",
    )))
}

pub async fn start_attempt(
    service: &ExamService,
    request: &HttpRequest,
    req: StartExamRequest,
) -> ActixResult<HttpResponse> {
    let (session, student) = match service.session_student(request) {
        Ok(pair) => pair,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    let exam = match storage.get_exam(session.school_id(), req.exam_id).await {
        Ok(Some(exam)) if exam.published && exam.is_for_grade(student.grade_level) => exam,
        Ok(_) => return Ok(tenancy::not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => {
            error!("Failed to load exam {}: {}", req.exam_id, e);
            return Ok(tenancy::internal_error("Failed to load exam"));
        }
    };

    // 已有记录可随时继续查看；新开始必须在考试时间窗内
    let existing = match storage.list_student_attempts(student.id).await {
        Ok(attempts) => attempts.into_iter().find(|a| a.exam_id == exam.id),
        Err(e) => {
            error!("Failed to list attempts for student {}: {}", student.id, e);
            return Ok(tenancy::internal_error("Failed to start exam"));
        }
    };
    if let Some(attempt) = existing {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptResponse { attempt },
            "Exam resumed",
        )));
    }

    if !exam.is_open_at(chrono::Utc::now()) {
        return Ok(tenancy::conflict(
            ErrorCode::ExamNotOpen,
            "Exam is not open",
        ));
    }

    match storage.start_exam_attempt(&exam, student.id).await {
        Ok(attempt) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptResponse { attempt },
            "Exam started",
        ))),
        Err(e) => {
            error!("Failed to start exam {}: {}", exam.id, e);
            Ok(tenancy::internal_error("Failed to start exam"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exams::fixtures::{exam_request, open_exam};
    use crate::services::test_support::read_json;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_start_is_single_attempt() {
        let fx = open_exam().await;
        let service = ExamService::new_lazy();
        let req = fx.student_request();

        let first = read_json(
            service
                .start_attempt(&req, StartExamRequest { exam_id: fx.exam.id })
                .await
                .unwrap(),
        )
        .await;
        let second = read_json(
            service
                .start_attempt(&req, StartExamRequest { exam_id: fx.exam.id })
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(first["data"]["attempt"]["id"], second["data"]["attempt"]["id"]);
        assert_eq!(first["data"]["attempt"]["status"], "in_progress");

        let list = read_json(service.list_student_exams(&req).await.unwrap()).await;
        let items = list["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["attempt_status"], "in_progress");
        assert_eq!(items[0]["is_open"], true);
    }

    #[actix_web::test]
    async fn test_cannot_start_before_window() {
        let fx = open_exam().await;
        let later = fx
            .storage
            .create_exam(fx.school_id, exam_request(60))
            .await
            .unwrap();
        let service = ExamService::new_lazy();

        let res = service
            .start_attempt(
                &fx.student_request(),
                StartExamRequest {
                    exam_id: later.exam.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
