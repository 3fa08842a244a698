use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::CareerService;
use crate::models::{ApiResponse, ErrorCode, careers::requests::ApplyJobRequest};
use crate::services::tenancy;
use crate::utils::validate::{normalize_optional, validate_email, validate_length};

pub fn validate_application(req: ApplyJobRequest) -> Result<ApplyJobRequest, String> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_string();
    validate_length("Name", &name, 2, 100)?;
    validate_email(&email).map_err(str::to_string)?;

    let phone = normalize_optional(req.phone);
    if let Some(phone) = &phone {
        validate_length("Phone", phone, 5, 40)?;
    }
    let cover_letter = normalize_optional(req.cover_letter);
    if let Some(letter) = &cover_letter {
        validate_length("Cover letter", letter, 1, 5000)?;
    }
    let resume_url = normalize_optional(req.resume_url);
    if let Some(url) = &resume_url {
        let parsed = url::Url::parse(url).map_err(|_| "Resume URL is invalid".to_string())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err("Resume URL must use http or https".to_string());
        }
    }

    Ok(ApplyJobRequest {
        name,
        email,
        phone,
        cover_letter,
        resume_url,
    })
}

pub async fn apply_to_job(
    service: &CareerService,
    request: &HttpRequest,
    slug: &str,
    req: ApplyJobRequest,
) -> ActixResult<HttpResponse> {
    let application = match validate_application(req) {
        Ok(application) => application,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::ApplicationInvalid, msg)),
    };

    let storage = service.get_storage(request);
    let school = match tenancy::resolve_school(&storage, request).await {
        Ok(school) => school,
        Err(res) => return Ok(res),
    };

    let job = match storage.get_job_by_slug(school.id, slug).await {
        Ok(Some(job)) => job,
        Ok(None) => return Ok(tenancy::not_found(ErrorCode::JobNotFound, "Job not found")),
        Err(e) => {
            error!("Failed to retrieve job {}: {}", slug, e);
            return Ok(tenancy::internal_error("Failed to retrieve job"));
        }
    };

    if !job.is_open(chrono::Utc::now()) {
        return Ok(tenancy::conflict(
            ErrorCode::JobClosed,
            "This job is no longer accepting applications",
        ));
    }

    match storage.create_application(school.id, job.id, application).await {
        Ok(created) => {
            info!("Application {} received for job {}", created.id, job.slug);
            Ok(HttpResponse::Created().json(ApiResponse::<()>::success_empty(
                "Application received",
            )))
        }
        Err(e) => {
            error!("Failed to save application: {}", e);
            Ok(tenancy::internal_error("Failed to save application"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::careers::{entities::EmploymentType, requests::JobDraft};
    use crate::services::test_support::public_request;
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;

    fn applicant(resume_url: Option<&str>) -> ApplyJobRequest {
        ApplyJobRequest {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
            cover_letter: Some("I love teaching.".to_string()),
            resume_url: resume_url.map(str::to_string),
        }
    }

    #[test]
    fn test_resume_url_must_be_http() {
        assert!(validate_application(applicant(Some("https://cv.example.com/g.pdf"))).is_ok());
        assert!(validate_application(applicant(Some("javascript:alert(1)"))).is_err());
        assert!(validate_application(applicant(Some("not a url"))).is_err());
    }

    #[actix_web::test]
    async fn test_closed_job_rejects_applications() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let base = JobDraft {
            title: "Librarian".to_string(),
            slug: "librarian".to_string(),
            department: None,
            location: None,
            employment_type: EmploymentType::Contract,
            description: "Run the school library and reading clubs.".to_string(),
            published: true,
            closes_at: None,
        };
        storage.create_job(school.id, base.clone()).await.unwrap();
        storage
            .create_job(
                school.id,
                JobDraft {
                    slug: "archivist".to_string(),
                    closes_at: Some(chrono::Utc::now() - chrono::Duration::days(1)),
                    ..base
                },
            )
            .await
            .unwrap();
        let service = CareerService::new_lazy();
        let req = public_request(&storage, "north");

        let res = service.apply(&req, "librarian", applicant(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = service.apply(&req, "archivist", applicant(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = service.apply(&req, "missing", applicant(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
