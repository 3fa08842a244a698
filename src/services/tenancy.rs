//! 租户解析与会话读取
//!
//! 公开接口按 `X-School` 头（缺省为 `app.default_school`）确定学校；
//! 受保护接口使用会话用户所属学校。

use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::error;

use crate::config::AppConfig;
use crate::errors::CampusError;
use crate::models::auth::entities::SessionUser;
use crate::models::directory::entities::School;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::is_valid_school_slug;

pub const SCHOOL_HEADER: &str = "X-School";

fn school_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SchoolNotFound,
        "School not found",
    ))
}

/// 请求指定的学校 slug
pub fn requested_school_slug(request: &HttpRequest) -> String {
    request
        .headers()
        .get(SCHOOL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| AppConfig::get().app.default_school.clone())
}

/// 解析公开请求的租户
pub async fn resolve_school(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<School, HttpResponse> {
    let slug = requested_school_slug(request);
    if !is_valid_school_slug(&slug) {
        return Err(school_not_found());
    }

    match storage.get_school_by_slug(&slug).await {
        Ok(Some(school)) => Ok(school),
        Ok(None) => Err(school_not_found()),
        Err(e) => {
            error!("Failed to resolve school {}: {}", slug, e);
            Err(internal_error("Failed to resolve school"))
        }
    }
}

/// 通过 AccessGate 后的会话
pub fn session_user(request: &HttpRequest) -> Result<SessionUser, HttpResponse> {
    request
        .extensions()
        .get::<SessionUser>()
        .cloned()
        .ok_or_else(unauthorized)
}

/// 通过 RequireJWT 或 AccessGate 后的用户
pub fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(unauthorized)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication required",
    ))
}

pub fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        message,
    ))
}

pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

/// 存储层错误转为响应，`code` 用于校验、冲突、未找到三类业务错误
pub fn storage_error(context: &str, code: ErrorCode, err: CampusError) -> HttpResponse {
    match err {
        CampusError::Validation(msg) => bad_request(code, msg),
        CampusError::Conflict(msg) => conflict(code, msg),
        CampusError::NotFound(msg) => not_found(code, msg),
        other => {
            error!("{}: {}", context, other);
            internal_error(context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::create_memory_storage;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_resolve_school_from_header() {
        let storage = create_memory_storage().await;
        storage.ensure_school("north-campus", "North").await.unwrap();

        let req = TestRequest::default()
            .insert_header((SCHOOL_HEADER, "North-Campus"))
            .to_http_request();
        let school = resolve_school(&storage, &req).await.unwrap();
        assert_eq!(school.slug, "north-campus");

        let req = TestRequest::default()
            .insert_header((SCHOOL_HEADER, "nowhere"))
            .to_http_request();
        let res = resolve_school(&storage, &req).await.unwrap_err();
        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);

        let req = TestRequest::default()
            .insert_header((SCHOOL_HEADER, "bad slug!"))
            .to_http_request();
        assert!(resolve_school(&storage, &req).await.is_err());
    }

    #[test]
    fn test_storage_error_status_mapping() {
        use actix_web::http::StatusCode;
        let res = storage_error("x", ErrorCode::InvoiceInvalid, CampusError::validation("bad"));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = storage_error("x", ErrorCode::InvoiceVoid, CampusError::conflict("void"));
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let res = storage_error("x", ErrorCode::InvoiceNotFound, CampusError::not_found("gone"));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = storage_error(
            "x",
            ErrorCode::InvoiceInvalid,
            CampusError::database_operation("boom"),
        );
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
