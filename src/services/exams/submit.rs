use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::TransitionOutcome, requests::SubmitAttemptRequest, responses::AttemptResponse,
    },
};
use crate::services::tenancy;

pub async fn submit_attempt(
    service: &ExamService,
    request: &HttpRequest,
    req: SubmitAttemptRequest,
) -> ActixResult<HttpResponse> {
    let own = match service.own_attempt(request, req.attempt_id).await {
        Ok(own) => own,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage
        .submit_exam_attempt(own.attempt.id, Some(own.session.user.id))
        .await
    {
        Ok(TransitionOutcome::Applied(attempt)) => {
            info!(
                "Attempt {} submitted by student {} with score {:?}/{:?}",
                attempt.id, own.student.id, attempt.score, attempt.max_score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttemptResponse { attempt },
                "Attempt submitted",
            )))
        }
        Ok(TransitionOutcome::Unchanged(attempt)) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(AttemptResponse { attempt }, "Attempt already submitted"),
        )),
        Ok(TransitionOutcome::Rejected(_)) => Ok(tenancy::conflict(
            ErrorCode::AttemptLocked,
            "Attempt is locked, ask your conductor to unlock it",
        )),
        Err(e) => {
            error!("Failed to submit attempt {}: {}", own.attempt.id, e);
            Ok(tenancy::internal_error("Failed to submit attempt"))
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
    async fn test_submit_scores_and_is_idempotent() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        fx.storage
            .save_answer(attempt.id, fx.choice_question().id, "4")
            .await
            .unwrap();
        let service = ExamService::new_lazy();
        let req = fx.student_request();
        let submit = || SubmitAttemptRequest {
            attempt_id: attempt.id,
        };

        let first = read_json(service.submit_attempt(&req, submit()).await.unwrap()).await;
        assert_eq!(first["data"]["attempt"]["status"], "submitted");
        assert_eq!(first["data"]["attempt"]["score"], 2);
        assert_eq!(first["data"]["attempt"]["max_score"], 2);

        let res = service.submit_attempt(&req, submit()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let again = read_json(res).await;
        assert_eq!(
            again["data"]["attempt"]["submitted_at"],
            first["data"]["attempt"]["submitted_at"]
        );
    }

    #[actix_web::test]
    async fn test_submit_locked_conflicts() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        fx.storage
            .lock_exam_attempt(attempt.id, None, None)
            .await
            .unwrap();
        let service = ExamService::new_lazy();

        let res = service
            .submit_attempt(
                &fx.student_request(),
                SubmitAttemptRequest {
                    attempt_id: attempt.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(
            read_json(res).await["code"],
            ErrorCode::AttemptLocked as i32
        );
    }
}
