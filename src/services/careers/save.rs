use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CareerService;
use crate::errors::CampusError;
use crate::models::{
    ApiResponse, ErrorCode,
    careers::requests::{JobDraft, SaveJobRequest},
};
use crate::services::tenancy;
use crate::utils::labels::slugify;
use crate::utils::validate::{normalize_optional, validate_length};

/// 校验职位内容并确定 slug；未给出 slug 时由标题生成
pub fn build_draft(req: SaveJobRequest) -> Result<JobDraft, String> {
    let title = req.title.trim().to_string();
    validate_length("Title", &title, 3, 120)?;

    let description = req.description.trim().to_string();
    if description.chars().count() < 20 {
        return Err("Description must be at least 20 characters".to_string());
    }

    let slug = match normalize_optional(req.slug) {
        Some(slug) => slugify(&slug),
        None => slugify(&title),
    };
    if slug.is_empty() {
        return Err("Slug must contain letters or digits".to_string());
    }
    validate_length("Slug", &slug, 1, 120)?;

    Ok(JobDraft {
        title,
        slug,
        department: normalize_optional(req.department),
        location: normalize_optional(req.location),
        employment_type: req.employment_type,
        description,
        published: req.published,
        closes_at: req.closes_at,
    })
}

pub async fn save_job(
    service: &CareerService,
    request: &HttpRequest,
    req: SaveJobRequest,
) -> ActixResult<HttpResponse> {
    let session = match tenancy::session_user(request) {
        Ok(session) => session,
        Err(res) => return Ok(res),
    };

    let id = req.id;
    let draft = match build_draft(req) {
        Ok(draft) => draft,
        Err(msg) => return Ok(tenancy::bad_request(ErrorCode::JobInvalid, msg)),
    };

    let storage = service.get_storage(request);
    let school_id = session.school_id();

    let result = match id {
        Some(id) => storage.update_job(school_id, id, draft).await,
        None => storage.create_job(school_id, draft).await.map(Some),
    };

    match result {
        Ok(Some(job)) => {
            info!(
                "Job {} ({}) saved by user {}",
                job.id, job.slug, session.user.id
            );
            let response = if id.is_some() {
                HttpResponse::Ok()
            } else {
                HttpResponse::Created()
            }
            .json(ApiResponse::success(job, "Job saved"));
            Ok(response)
        }
        Ok(None) => Ok(tenancy::not_found(ErrorCode::JobNotFound, "Job not found")),
        Err(CampusError::Conflict(_)) => Ok(tenancy::conflict(
            ErrorCode::JobSlugTaken,
            "A job with this slug already exists",
        )),
        Err(e) => Ok(tenancy::storage_error(
            "Failed to save job",
            ErrorCode::JobInvalid,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Area;
    use crate::models::careers::entities::EmploymentType;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{fake_user, read_json, session_request};
    use crate::storage::create_memory_storage;
    use actix_web::http::StatusCode;

    fn save(id: Option<i64>, title: &str, slug: Option<&str>) -> SaveJobRequest {
        SaveJobRequest {
            id,
            title: title.to_string(),
            slug: slug.map(str::to_string),
            department: Some("Science".to_string()),
            location: None,
            employment_type: EmploymentType::FullTime,
            description: "Teach physics to grades nine through twelve.".to_string(),
            published: true,
            closes_at: None,
        }
    }

    #[test]
    fn test_slug_derived_from_title() {
        let draft = build_draft(save(None, "  Senior Physics Teacher (2025)! ", None)).unwrap();
        assert_eq!(draft.slug, "senior-physics-teacher-2025");
        assert_eq!(draft.title, "Senior Physics Teacher (2025)!");

        let draft = build_draft(save(None, "Physics", Some("Custom Slug"))).unwrap();
        assert_eq!(draft.slug, "custom-slug");

        assert!(build_draft(save(None, "Hi", None)).is_err());
        assert!(build_draft(save(None, "!!!", None)).is_err());
        let mut short = save(None, "Physics Teacher", None);
        short.description = "Too short".to_string();
        assert!(build_draft(short).is_err());
    }

    #[actix_web::test]
    async fn test_upsert_and_duplicate_slug() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("north", "North").await.unwrap();
        let service = CareerService::new_lazy();
        let req = session_request(&storage, fake_user(school.id, UserRole::Staff), Area::Admin, None);

        let res = service
            .save_job(&req, save(None, "Physics Teacher", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let id = read_json(res).await["data"]["id"].as_i64().unwrap();

        let res = service
            .save_job(&req, save(None, "Physics Teacher", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let res = service
            .save_job(&req, save(Some(id), "Physics Teacher (Senior)", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            read_json(res).await["data"]["slug"],
            "physics-teacher-senior"
        );

        let res = service
            .save_job(&req, save(Some(id + 100), "Physics Teacher", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
