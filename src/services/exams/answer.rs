use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::{AnswerOutcome, AttemptStatus},
        requests::SaveAnswerRequest,
        responses::AnswerResponse,
    },
};
use crate::services::tenancy;

pub const MAX_ANSWER_CHARS: usize = 5000;

pub async fn save_answer(
    service: &ExamService,
    request: &HttpRequest,
    req: SaveAnswerRequest,
) -> ActixResult<HttpResponse> {
    if req.answer.chars().count() > MAX_ANSWER_CHARS {
        return Ok(tenancy::bad_request(
            ErrorCode::AnswerInvalid,
            format!("Answer must be at most {MAX_ANSWER_CHARS} characters"),
        ));
    }

    let own = match service.own_attempt(request, req.attempt_id).await {
        Ok(own) => own,
        Err(res) => return Ok(res),
    };
    let attempt = own.attempt;

    if let Some(res) = closed_response(attempt.status) {
        return Ok(res);
    }

    let grace_seconds = service.get_config().exams.grace_seconds;
    if attempt.is_expired(chrono::Utc::now(), grace_seconds) {
        return Ok(tenancy::conflict(
            ErrorCode::AttemptExpired,
            "Time is up for this attempt",
        ));
    }

    let storage = service.get_storage(request);
    let question = match storage.list_exam_questions(attempt.exam_id).await {
        Ok(questions) => questions.into_iter().find(|q| q.id == req.question_id),
        Err(e) => {
            error!("Failed to load questions for exam {}: {}", attempt.exam_id, e);
            return Ok(tenancy::internal_error("Failed to save answer"));
        }
    };
    let Some(question) = question else {
        return Ok(tenancy::not_found(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ));
    };

    if !question.accepts(&req.answer) {
        return Ok(tenancy::bad_request(
            ErrorCode::AnswerInvalid,
            "Answer must be one of the options",
        ));
    }

    match storage
        .save_answer(attempt.id, question.id, &req.answer)
        .await
    {
        Ok(AnswerOutcome::Saved(answer)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnswerResponse { answer },
            "Answer saved",
        ))),
        // 读取之后被锁定或交卷
        Ok(AnswerOutcome::Closed(latest)) => Ok(closed_response(latest.status)
            .unwrap_or_else(|| tenancy::internal_error("Failed to save answer"))),
        Err(e) => {
            error!("Failed to save answer on attempt {}: {}", attempt.id, e);
            Ok(tenancy::internal_error("Failed to save answer"))
        }
    }
}

fn closed_response(status: AttemptStatus) -> Option<HttpResponse> {
    match status {
        AttemptStatus::InProgress => None,
        AttemptStatus::Locked => Some(tenancy::conflict(
            ErrorCode::AttemptLocked,
            "Attempt is locked",
        )),
        AttemptStatus::Submitted => Some(tenancy::conflict(
            ErrorCode::AttemptSubmitted,
            "Attempt has already been submitted",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exams::fixtures::open_exam;
    use crate::services::test_support::read_json;
    use actix_web::http::StatusCode;

    fn answer(attempt_id: i64, question_id: i64, answer: &str) -> SaveAnswerRequest {
        SaveAnswerRequest {
            attempt_id,
            question_id,
            answer: answer.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_answer_rules() {
        let fx = open_exam().await;
        let attempt = fx
            .storage
            .start_exam_attempt(&fx.exam, fx.student.id)
            .await
            .unwrap();
        let choice = fx.choice_question().id;
        let service = ExamService::new_lazy();
        let req = fx.student_request();

        let res = service.save_answer(&req, answer(attempt.id, choice, "4")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        // 再次作答覆盖原答案
        let res = service.save_answer(&req, answer(attempt.id, choice, "5")).await.unwrap();
        assert_eq!(read_json(res).await["data"]["answer"]["answer"], "5");
        let saved = fx.storage.list_attempt_answers(attempt.id).await.unwrap();
        assert_eq!(saved.len(), 1);

        let res = service.save_answer(&req, answer(attempt.id, choice, "42")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = service.save_answer(&req, answer(attempt.id, 9_999, "4")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let long = "x".repeat(MAX_ANSWER_CHARS + 1);
        let res = service.save_answer(&req, answer(attempt.id, choice, &long)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        fx.storage
            .lock_exam_attempt(attempt.id, None, None)
            .await
            .unwrap();
        let res = service.save_answer(&req, answer(attempt.id, choice, "4")).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(
            read_json(res).await["code"],
            ErrorCode::AttemptLocked as i32
        );
    }
}
