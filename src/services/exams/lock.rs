use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{entities::TransitionOutcome, requests::LockAttemptRequest, responses::AttemptResponse},
};
use crate::services::tenancy;
use crate::utils::validate::normalize_optional;

pub async fn lock_attempt(
    service: &ExamService,
    request: &HttpRequest,
    req: LockAttemptRequest,
) -> ActixResult<HttpResponse> {
    let own = match service.own_attempt(request, req.attempt_id).await {
        Ok(own) => own,
        Err(res) => return Ok(res),
    };
    let reason = normalize_optional(req.reason).map(|r| r.chars().take(200).collect::<String>());
    let storage = service.get_storage(request);

    match storage
        .lock_exam_attempt(own.attempt.id, Some(own.session.user.id), reason)
        .await
    {
        Ok(TransitionOutcome::Applied(attempt)) => {
            info!(
                "Attempt {} locked for student {}",
                attempt.id, own.student.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttemptResponse { attempt },
                "Attempt locked",
            )))
        }
        Ok(TransitionOutcome::Unchanged(attempt)) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(AttemptResponse { attempt }, "Attempt already locked"),
        )),
        Ok(TransitionOutcome::Rejected(_)) => Ok(tenancy::conflict(
            ErrorCode::AttemptSubmitted,
            "Attempt has already been submitted",
        )),
        Err(e) => {
            error!("Failed to lock attempt {}: {}", own.attempt.id, e);
            Ok(tenancy::internal_error("Failed to lock attempt"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exams::entities::AttemptEventKind;
    use crate::services::exams::fixtures::open_exam;
    use crate::services::test_support::read_json;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_lock_is_idempotent_with_one_event() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        let service = ExamService::new_lazy();
        let req = fx.student_request();
        let lock = || LockAttemptRequest {
            attempt_id: attempt.id,
            reason: Some("tab switched".into()),
        };

        for _ in 0..3 {
            let res = service.lock_attempt(&req, lock()).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(read_json(res).await["data"]["attempt"]["status"], "locked");
        }

        let events = fx.storage.list_attempt_events(attempt.id).await.unwrap();
        let locked: Vec<_> = events
            .iter()
            .filter(|e| e.kind == AttemptEventKind::Locked)
            .collect();
        assert_eq!(locked.len(), 1);
        assert_eq!(locked[0].reason.as_deref(), Some("tab switched"));
    }

    #[actix_web::test]
    async fn test_lock_after_submit_conflicts() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        fx.storage
            .submit_exam_attempt(attempt.id, None)
            .await
            .unwrap();
        let service = ExamService::new_lazy();

        let res = service
            .lock_attempt(
                &fx.student_request(),
                LockAttemptRequest {
                    attempt_id: attempt.id,
                    reason: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
