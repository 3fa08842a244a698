use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AdmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    admissions::{requests::StartApplicationRequest, responses::StartApplicationResponse},
};
use crate::services::tenancy;
use crate::utils::random_code::generate_resume_token;
use crate::utils::validate::{normalize_optional, validate_email, validate_length};

pub fn validate_start(req: StartApplicationRequest) -> Result<StartApplicationRequest, String> {
    let guardian_name = req.guardian_name.trim().to_string();
    let guardian_email = req.guardian_email.trim().to_string();

    validate_length("Guardian name", &guardian_name, 2, 100)?;
    validate_email(&guardian_email).map_err(str::to_string)?;

    let student_name = normalize_optional(req.student_name);
    if let Some(name) = &student_name {
        validate_length("Student name", name, 2, 100)?;
    }
    if let Some(grade) = req.grade_applying
        && !(0..=12).contains(&grade)
    {
        return Err("Grade must be between 0 and 12".to_string());
    }

    Ok(StartApplicationRequest {
        guardian_name,
        guardian_email,
        guardian_phone: normalize_optional(req.guardian_phone),
        student_name,
        grade_applying: req.grade_applying,
    })
}

pub async fn start_application(
    service: &AdmissionService,
    request: &HttpRequest,
    req: StartApplicationRequest,
) -> ActixResult<HttpResponse> {
    let application = match validate_start(req) {
        Ok(application) => application,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::LeadInvalid, msg)),
    };

    let storage = service.get_storage(request);
    let school = match tenancy::resolve_school(&storage, request).await {
        Ok(school) => school,
        Err(res) => return Ok(res),
    };

    let token = generate_resume_token();
    match storage.create_lead(school.id, &token, application).await {
        Ok(lead) => {
            info!("Admission lead {} started for school {}", lead.id, school.slug);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StartApplicationResponse {
                    token,
                    step: lead.step,
                },
                "Application started",
            )))
        }
        Err(e) => {
            error!("Failed to start application: {}", e);
            Ok(tenancy::internal_error("Failed to start application"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{public_request, read_json};
    use crate::storage::create_memory_storage;
    use crate::utils::random_code::is_valid_resume_token;
    use actix_web::http::StatusCode;

    fn start(name: &str, email: &str) -> StartApplicationRequest {
        StartApplicationRequest {
            guardian_name: name.to_string(),
            guardian_email: email.to_string(),
            guardian_phone: Some("  ".to_string()),
            student_name: None,
            grade_applying: Some(4),
        }
    }

    #[test]
    fn test_validate_start() {
        assert!(validate_start(start("A", "ann@example.com")).is_err());
        assert!(validate_start(start("Ann", "ann@")).is_err());
        let ok = validate_start(start(" Ann Parent ", "ann@example.com")).unwrap();
        assert_eq!(ok.guardian_name, "Ann Parent");
        assert_eq!(ok.guardian_phone, None);
    }

    #[actix_web::test]
    async fn test_start_returns_resume_token() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let service = AdmissionService::new_lazy();

        let res = service
            .start(
                &public_request(&storage, "north"),
                start("Ann Parent", "ann@example.com"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = read_json(res).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert!(is_valid_resume_token(&token));
        assert_eq!(body["data"]["step"], 1);

        let lead = storage
            .get_lead_by_token(school.id, &token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lead.guardian_email, "ann@example.com");
    }
}
