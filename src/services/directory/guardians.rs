use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DirectoryService;
use crate::models::{ApiResponse, ErrorCode, directory::requests::CreateGuardianRequest};
use crate::services::tenancy;
use crate::utils::validate::{normalize_optional, validate_email, validate_length};

pub fn validate_guardian(req: CreateGuardianRequest) -> Result<CreateGuardianRequest, String> {
    let full_name = req.full_name.trim().to_string();
    validate_length("Name", &full_name, 2, 100)?;

    let email = normalize_optional(req.email).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        validate_email(email)?;
    }

    let mut student_ids = req.student_ids;
    student_ids.sort_unstable();
    student_ids.dedup();
    if student_ids.is_empty() {
        return Err("Guardian must be linked to at least one student".to_string());
    }

    Ok(CreateGuardianRequest {
        full_name,
        email,
        phone: normalize_optional(req.phone),
        student_ids,
        relationship: normalize_optional(req.relationship),
    })
}

pub async fn create_guardian(
    service: &DirectoryService,
    request: &HttpRequest,
    req: CreateGuardianRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let req = match validate_guardian(req) {
        Ok(req) => req,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::GuardianInvalid, msg)),
    };
    let storage = service.get_storage(request);

    match storage.create_guardian(session.school_id(), req).await {
        Ok(created) => {
            info!(
                "Guardian {} created with {} linked students",
                created.guardian.id,
                created.links.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Guardian created")))
        }
        Err(e) => Ok(tenancy::storage_error(
            "Failed to create guardian",
            ErrorCode::StudentNotFound,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guardian(ids: Vec<i64>) -> CreateGuardianRequest {
        CreateGuardianRequest {
            full_name: " Anne Lovelace ".into(),
            email: Some("Anne@Example.com".into()),
            phone: Some("  ".into()),
            student_ids: ids,
            relationship: None,
        }
    }

    #[test]
    fn test_guardian_validation() {
        let ok = validate_guardian(guardian(vec![3, 1, 3])).unwrap();
        assert_eq!(ok.full_name, "Anne Lovelace");
        assert_eq!(ok.email.as_deref(), Some("anne@example.com"));
        assert_eq!(ok.phone, None);
        assert_eq!(ok.student_ids, vec![1, 3]);

        assert!(validate_guardian(guardian(vec![])).is_err());

        let mut bad_email = guardian(vec![1]);
        bad_email.email = Some("not-an-email".into());
        assert!(validate_guardian(bad_email).is_err());
    }
}
