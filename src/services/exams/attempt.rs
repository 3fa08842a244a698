use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ExamService;
use crate::models::{
    ApiResponse,
    exams::{
        requests::AttemptQuery,
        responses::{AttemptDetailResponse, PublicQuestion},
    },
};
use crate::services::tenancy;

pub async fn get_attempt_detail(
    service: &ExamService,
    request: &HttpRequest,
    query: AttemptQuery,
) -> ActixResult<HttpResponse> {
    let own = match service.own_attempt(request, query.attempt_id).await {
        Ok(own) => own,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    let loaded = async {
        let exam = storage
            .get_exam(own.session.school_id(), own.attempt.exam_id)
            .await?;
        let questions = storage.list_exam_questions(own.attempt.exam_id).await?;
        let answers = storage.list_attempt_answers(own.attempt.id).await?;
        crate::errors::Result::Ok((exam, questions, answers))
    }
    .await;

    match loaded {
        Ok((Some(exam), questions, answers)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptDetailResponse {
                exam,
                attempt: own.attempt,
                questions: questions.into_iter().map(PublicQuestion::from).collect(),
                answers,
            },
            "Attempt retrieved successfully",
        ))),
        Ok((None, _, _)) => Ok(tenancy::internal_error("Exam missing for attempt")),
        Err(e) => {
            error!("Failed to load attempt {}: {}", own.attempt.id, e);
            Ok(tenancy::internal_error("Failed to load attempt"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exams::fixtures::open_exam;
    use crate::services::test_support::read_json;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_detail_hides_correct_answers_and_other_students() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        let service = ExamService::new_lazy();

        let body = read_json(
            service
                .get_attempt(
                    &fx.student_request(),
                    AttemptQuery {
                        attempt_id: attempt.id,
                    },
                )
                .await
                .unwrap(),
        )
        .await;
        let questions = body["data"]["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.get("correct_answer").is_none()));

        let other = fx.other_student().await;
        let res = service
            .get_attempt(
                &fx.request_for(&other),
                AttemptQuery {
                    attempt_id: attempt.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
