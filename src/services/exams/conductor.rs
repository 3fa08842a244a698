use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::TransitionOutcome,
        requests::{AttemptListParams, UnlockAttemptRequest},
        responses::{AttemptEventListResponse, AttemptListResponse, AttemptResponse},
    },
};
use crate::services::tenancy;
use crate::utils::validate::normalize_optional;

pub async fn list_attempts(
    service: &ExamService,
    request: &HttpRequest,
    query: AttemptListParams,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage.list_attempts(session.school_id(), query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptListResponse { items },
            "Attempts retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve attempts",
            ErrorCode::AttemptNotFound,
            e,
        )),
    }
}

pub async fn unlock_attempt(
    service: &ExamService,
    request: &HttpRequest,
    req: UnlockAttemptRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    // 只能解锁本校考试的记录
    match storage.get_attempt(session.school_id(), req.attempt_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(tenancy::not_found(
                ErrorCode::AttemptNotFound,
                "Attempt not found",
            ));
        }
        Err(e) => {
            error!("Failed to load attempt {}: {}", req.attempt_id, e);
            return Ok(tenancy::internal_error("Failed to unlock attempt"));
        }
    }

    let reason = normalize_optional(req.reason).map(|r| r.chars().take(200).collect::<String>());
    match storage
        .unlock_exam_attempt(req.attempt_id, Some(session.user.id), reason)
        .await
    {
        Ok(TransitionOutcome::Applied(attempt)) => {
            info!(
                "Attempt {} unlocked by conductor {}",
                attempt.id, session.user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttemptResponse { attempt },
                "Attempt unlocked",
            )))
        }
        Ok(TransitionOutcome::Unchanged(_)) | Ok(TransitionOutcome::Rejected(_)) => {
            Ok(tenancy::conflict(
                ErrorCode::AttemptNotLocked,
                "Attempt is not locked",
            ))
        }
        Err(e) => {
            error!("Failed to unlock attempt {}: {}", req.attempt_id, e);
            Ok(tenancy::internal_error("Failed to unlock attempt"))
        }
    }
}

pub async fn list_attempt_events(
    service: &ExamService,
    request: &HttpRequest,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    let attempt = match storage.get_attempt(session.school_id(), attempt_id).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => {
            return Ok(tenancy::not_found(
                ErrorCode::AttemptNotFound,
                "Attempt not found",
            ));
        }
        Err(e) => {
            error!("Failed to load attempt {}: {}", attempt_id, e);
            return Ok(tenancy::internal_error("Failed to retrieve events"));
        }
    };

    match storage.list_attempt_events(attempt.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptEventListResponse { attempt, items },
            "Events retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to load events for attempt {}: {}", attempt_id, e);
            Ok(tenancy::internal_error("Failed to retrieve events"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exams::entities::AttemptStatus;
    use crate::services::exams::fixtures::open_exam;
    use crate::services::test_support::read_json;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_unlock_flow_and_events() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        let service = ExamService::new_lazy();
        let req = fx.conductor_request();
        let unlock = || UnlockAttemptRequest {
            attempt_id: attempt.id,
            reason: Some("proctor ok".into()),
        };

        // 未锁定时不能解锁
        let res = service.unlock_attempt(&req, unlock()).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        fx.storage
            .lock_exam_attempt(attempt.id, None, Some("focus lost".into()))
            .await
            .unwrap();

        let locked = read_json(
            service
                .list_attempts(
                    &req,
                    AttemptListParams {
                        exam_id: Some(fx.exam.id),
                        status: Some(AttemptStatus::Locked),
                    },
                )
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(locked["data"]["items"].as_array().unwrap().len(), 1);

        let res = service.unlock_attempt(&req, unlock()).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            read_json(res).await["data"]["attempt"]["status"],
            "in_progress"
        );

        let events = read_json(service.list_attempt_events(&req, attempt.id).await.unwrap()).await;
        let kinds: Vec<&str> = events["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["started", "locked", "unlocked"]);
    }
}
