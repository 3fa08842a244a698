use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::DirectoryService;
use crate::errors::CampusError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::tenancy;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_optional, validate_email, validate_password_simple};

/// 校验账号字段及角色关联，返回规范化后的请求（密码仍为明文）
pub fn validate_account(req: CreateUserRequest) -> Result<CreateUserRequest, String> {
    let email = req.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_password_simple(&req.password)?;

    match req.role {
        UserRole::Student if req.student_id.is_none() => {
            return Err("Student accounts must be linked to a student record".to_string());
        }
        UserRole::Guardian if req.guardian_id.is_none() => {
            return Err("Guardian accounts must be linked to a guardian record".to_string());
        }
        _ => {}
    }

    Ok(CreateUserRequest {
        email,
        display_name: normalize_optional(req.display_name),
        student_id: req.student_id.filter(|_| req.role == UserRole::Student),
        guardian_id: req.guardian_id.filter(|_| req.role == UserRole::Guardian),
        ..req
    })
}

pub async fn create_user(
    service: &DirectoryService,
    request: &HttpRequest,
    req: CreateUserRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let mut req = match validate_account(req) {
        Ok(req) => req,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::UserInvalid, msg)),
    };

    req.password = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(tenancy::internal_error("Password hashing failed"));
        }
    };

    let storage = service.get_storage(request);
    match storage.create_user(session.school_id(), req).await {
        Ok(user) => {
            info!(
                "User {} ({}) created by {}",
                user.id, user.role, session.user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(UserResponse { user }, "User created")))
        }
        Err(CampusError::Conflict(_)) => Ok(tenancy::conflict(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to create user",
            ErrorCode::UserInvalid,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Area;
    use crate::models::directory::requests::CreateStudentRequest;
    use crate::services::test_support::{fake_user, read_json, session_request};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;

    fn account(email: &str, role: UserRole, student_id: Option<i64>) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            password: "Campus2026x".into(),
            role,
            display_name: None,
            student_id,
            guardian_id: None,
        }
    }

    #[test]
    fn test_account_validation() {
        let ok = validate_account(account(" Staff@Example.com ", UserRole::Staff, Some(9))).unwrap();
        assert_eq!(ok.email, "staff@example.com");
        assert_eq!(ok.student_id, None);

        assert!(validate_account(account("kid@example.com", UserRole::Student, None)).is_err());

        let mut weak = account("staff@example.com", UserRole::Staff, None);
        weak.password = "short".into();
        assert!(validate_account(weak).is_err());
    }

    #[actix_web::test]
    async fn test_create_student_account() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let student = storage
            .create_student(
                school.id,
                CreateStudentRequest {
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                    grade_level: 5,
                    admission_no: "A-1".into(),
                },
            )
            .await
            .unwrap();
        let req = session_request(
            &storage,
            fake_user(school.id, UserRole::Admin),
            Area::Admin,
            None,
        );
        let service = DirectoryService::new_lazy();

        let res = service
            .create_user(&req, account("ada@example.com", UserRole::Student, Some(student.id)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = read_json(res).await;
        assert_eq!(body["data"]["user"]["role"], "student");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let res = service
            .create_user(&req, account("ada@example.com", UserRole::Staff, None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let linked = storage
            .get_student_by_user_id(
                storage
                    .get_user_by_email(school.id, "ada@example.com")
                    .await
                    .unwrap()
                    .unwrap()
                    .id,
            )
            .await
            .unwrap();
        assert_eq!(linked.map(|s| s.id), Some(student.id));
    }
}
