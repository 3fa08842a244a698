use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectoryService;
use crate::models::{
    ApiResponse, ErrorCode,
    directory::requests::{CreateStudentRequest, StudentListParams, StudentListQuery},
};
use crate::services::tenancy;
use crate::utils::validate::validate_length;

pub fn validate_student(req: CreateStudentRequest) -> Result<CreateStudentRequest, String> {
    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    let admission_no = req.admission_no.trim().to_string();
    validate_length("First name", &first_name, 1, 100)?;
    validate_length("Last name", &last_name, 1, 100)?;
    validate_length("Admission number", &admission_no, 1, 40)?;
    if !(0..=12).contains(&req.grade_level) {
        return Err("Grade must be between 0 and 12".to_string());
    }
    Ok(CreateStudentRequest {
        first_name,
        last_name,
        grade_level: req.grade_level,
        admission_no,
    })
}

pub async fn list_students(
    service: &DirectoryService,
    request: &HttpRequest,
    query: StudentListParams,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage
        .list_students_with_pagination(session.school_id(), StudentListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve students",
            ErrorCode::StudentInvalid,
            e,
        )),
    }
}

pub async fn create_student(
    service: &DirectoryService,
    request: &HttpRequest,
    req: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let req = match validate_student(req) {
        Ok(req) => req,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::StudentInvalid, msg)),
    };
    let storage = service.get_storage(request);

    match storage.create_student(session.school_id(), req).await {
        Ok(student) => {
            info!("Student {} created in school {}", student.id, student.school_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(student, "Student created")))
        }
        Err(e) => Ok(tenancy::storage_error(
            "Failed to create student",
            ErrorCode::StudentInvalid,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Area;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{fake_user, read_json, session_request};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;

    fn student(first: &str, no: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            first_name: format!(" {first} "),
            last_name: "Lovelace".into(),
            grade_level: 5,
            admission_no: no.into(),
        }
    }

    #[test]
    fn test_student_validation() {
        let ok = validate_student(student("Ada", "A-1")).unwrap();
        assert_eq!(ok.first_name, "Ada");

        let mut bad_grade = student("Ada", "A-1");
        bad_grade.grade_level = 13;
        assert!(validate_student(bad_grade).is_err());
        assert!(validate_student(student("  ", "A-1")).is_err());
    }

    #[actix_web::test]
    async fn test_create_and_list_students() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let req = session_request(
            &storage,
            fake_user(school.id, UserRole::Admin),
            Area::Admin,
            None,
        );
        let service = DirectoryService::new_lazy();

        let res = service.create_student(&req, student("Ada", "A-1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = service.create_student(&req, student("Ben", "A-1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let query: StudentListParams = serde_json::from_value(serde_json::json!({})).unwrap();
        let body = read_json(service.list_students(&req, query).await.unwrap()).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["pagination"]["total"], 1);
    }
}
