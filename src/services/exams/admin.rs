use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::QuestionKind,
        requests::{CreateExamRequest, CreateQuestionRequest},
        responses::ExamListResponse,
    },
};
use crate::services::tenancy;
use crate::utils::validate::{normalize_optional, validate_length};

fn validate_question(index: usize, q: CreateQuestionRequest) -> Result<CreateQuestionRequest, String> {
    let n = index + 1;
    let prompt = q.prompt.trim().to_string();
    validate_length(&format!("Question {n} prompt"), &prompt, 1, 2000)?;
    if !(0..=100).contains(&q.points) {
        return Err(format!("Question {n} points must be between 0 and 100"));
    }

    let options: Vec<String> = q
        .options
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    let correct_answer = normalize_optional(q.correct_answer);

    match q.kind {
        QuestionKind::Choice => {
            if options.len() < 2 {
                return Err(format!("Question {n} needs at least two options"));
            }
            match &correct_answer {
                Some(answer) if options.contains(answer) => {}
                _ => return Err(format!("Question {n} correct answer must be one of the options")),
            }
        }
        QuestionKind::Text => {
            if !options.is_empty() {
                return Err(format!("Question {n} is a text question and cannot have options"));
            }
        }
    }

    Ok(CreateQuestionRequest {
        prompt,
        kind: q.kind,
        options,
        correct_answer,
        points: q.points,
    })
}

pub fn validate_exam(req: CreateExamRequest) -> Result<CreateExamRequest, String> {
    let title = req.title.trim().to_string();
    validate_length("Title", &title, 3, 200)?;
    if !(1..=600).contains(&req.duration_minutes) {
        return Err("Duration must be between 1 and 600 minutes".to_string());
    }
    if req.closes_at <= req.opens_at {
        return Err("Exam must close after it opens".to_string());
    }
    if let Some(grade) = req.grade_level
        && !(0..=12).contains(&grade)
    {
        return Err("Grade must be between 0 and 12".to_string());
    }
    if req.questions.is_empty() {
        return Err("Exam needs at least one question".to_string());
    }

    let questions = req
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| validate_question(i, q))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreateExamRequest {
        title,
        questions,
        ..req
    })
}

pub async fn create_exam(
    service: &ExamService,
    request: &HttpRequest,
    req: CreateExamRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let exam = match validate_exam(req) {
        Ok(exam) => exam,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::ExamInvalid, msg)),
    };
    let storage = service.get_storage(request);

    match storage.create_exam(session.school_id(), exam).await {
        Ok(detail) => {
            info!(
                "Exam {} created with {} questions by user {}",
                detail.exam.id,
                detail.questions.len(),
                session.user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Exam created")))
        }
        Err(e) => Ok(tenancy::storage_error(
            "Failed to create exam",
            ErrorCode::ExamInvalid,
            e,
        )),
    }
}

pub async fn list_exams(service: &ExamService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage.list_exams(session.school_id()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamListResponse { items },
            "Exams retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve exams",
            ErrorCode::ExamInvalid,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exams::fixtures::exam_request;

    #[test]
    fn test_exam_validation() {
        assert!(validate_exam(exam_request(0)).is_ok());

        let mut bad_window = exam_request(0);
        bad_window.closes_at = bad_window.opens_at;
        assert!(validate_exam(bad_window).is_err());

        let mut wrong_answer = exam_request(0);
        wrong_answer.questions[0].correct_answer = Some("7".into());
        assert!(validate_exam(wrong_answer).is_err());

        let mut text_with_options = exam_request(0);
        text_with_options.questions[1].options = vec!["a".into()];
        assert!(validate_exam(text_with_options).is_err());

        let mut empty = exam_request(0);
        empty.questions.clear();
        assert!(validate_exam(empty).is_err());
    }
}
