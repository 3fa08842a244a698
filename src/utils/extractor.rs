//! 路径参数提取器
//!
//! 在进入处理函数前校验路径参数，非法值直接返回 400。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ApiResponse, ErrorCode};

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid slug regex"));

fn bad_path_param(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 正整数 ID（路径参数 `{id}`）
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        let result = match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_path_param(format!("Invalid id: '{raw}'"))),
        };
        ready(result)
    }
}

/// 职位 slug（路径参数 `{slug}`）
#[derive(Debug, Clone)]
pub struct SafeSlug(pub String);

impl FromRequest for SafeSlug {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("slug").unwrap_or_default();
        let result = if raw.len() <= 120 && SLUG_RE.is_match(raw) {
            Ok(SafeSlug(raw.to_string()))
        } else {
            Err(bad_path_param(format!("Invalid slug: '{raw}'")))
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_rejects_non_positive() {
        let (req, mut payload) = TestRequest::default()
            .param("id", "0")
            .to_http_parts();
        assert!(SafeIDI64::from_request(&req, &mut payload).await.is_err());

        let (req, mut payload) = TestRequest::default()
            .param("id", "42")
            .to_http_parts();
        assert_eq!(
            SafeIDI64::from_request(&req, &mut payload).await.unwrap().0,
            42
        );
    }

    #[actix_web::test]
    async fn test_safe_slug() {
        let (req, mut payload) = TestRequest::default()
            .param("slug", "math-teacher")
            .to_http_parts();
        assert!(SafeSlug::from_request(&req, &mut payload).await.is_ok());

        let (req, mut payload) = TestRequest::default()
            .param("slug", "Math--Teacher")
            .to_http_parts();
        assert!(SafeSlug::from_request(&req, &mut payload).await.is_err());
    }
}
