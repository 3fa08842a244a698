use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::CareerService;
use crate::models::{ApiResponse, ErrorCode, careers::responses::JobListResponse};
use crate::services::tenancy;

pub async fn list_jobs(service: &CareerService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };
    let storage = service.get_storage(request);

    match storage.list_jobs(session.school_id(), false).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            JobListResponse { items },
            "Jobs retrieved successfully",
        ))),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to retrieve jobs",
            ErrorCode::JobInvalid,
            e,
        )),
    }
}

pub async fn list_open_jobs(
    service: &CareerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let school = match tenancy::resolve_school(&storage, request).await {
        Ok(school) => school,
        Err(res) => return Ok(res),
    };

    match storage.list_jobs(school.id, true).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            JobListResponse { items },
            "Jobs retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to retrieve open jobs: {}", e);
            Ok(tenancy::internal_error("Failed to retrieve jobs"))
        }
    }
}

/// 未发布或已截止的职位对外视为不存在
pub async fn get_open_job(
    service: &CareerService,
    request: &HttpRequest,
    slug: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let school = match tenancy::resolve_school(&storage, request).await {
        Ok(school) => school,
        Err(res) => return Ok(res),
    };

    match storage.get_job_by_slug(school.id, slug).await {
        Ok(Some(job)) if job.is_open(chrono::Utc::now()) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(job, "Job retrieved successfully")))
        }
        Ok(_) => Ok(tenancy::not_found(ErrorCode::JobNotFound, "Job not found")),
        Err(e) => {
            error!("Failed to retrieve job {}: {}", slug, e);
            Ok(tenancy::internal_error("Failed to retrieve job"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::careers::{entities::EmploymentType, requests::JobDraft};
    use crate::services::test_support::{public_request, read_json};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;

    fn draft(slug: &str, published: bool) -> JobDraft {
        JobDraft {
            title: format!("Job {slug}"),
            slug: slug.to_string(),
            department: None,
            location: None,
            employment_type: EmploymentType::PartTime,
            description: "A long enough description for the job.".to_string(),
            published,
            closes_at: None,
        }
    }

    #[actix_web::test]
    async fn test_public_listing_hides_unpublished() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        storage.create_job(school.id, draft("open-role", true)).await.unwrap();
        storage.create_job(school.id, draft("hidden-role", false)).await.unwrap();
        let service = CareerService::new_lazy();
        let req = public_request(&storage, "north");

        let body = read_json(service.list_open_jobs(&req).await.unwrap()).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["slug"], "open-role");

        let res = service.get_open_job(&req, "hidden-role").await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = service.get_open_job(&req, "open-role").await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
