use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::tenancy;
use crate::utils::jwt;

use super::AuthService;

fn login_expired() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
        .cookie(jwt::JwtUtils::create_empty_session_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Refresh token rejected: {}", e);
            return Ok(login_expired());
        }
    };
    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(login_expired());
    };

    // 账号被停用或删除后不再续期
    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() && user.school_id == claims.school_id => user,
        Ok(_) => return Ok(login_expired()),
        Err(e) => {
            error!("Failed to load user {} for refresh: {}", user_id, e);
            return Ok(tenancy::internal_error("Failed to refresh token"));
        }
    };

    match jwt::JwtUtils::generate_access_token(user.id, user.school_id, user.role.as_str()) {
        Ok(access_token) => {
            let session_cookie = jwt::JwtUtils::create_session_cookie(&access_token);
            let response = RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            };
            Ok(HttpResponse::Ok()
                .cookie(session_cookie)
                .json(ApiResponse::success(response, "Token refreshed successfully")))
        }
        Err(e) => {
            error!("Failed to generate access token: {}", e);
            Ok(tenancy::internal_error("Failed to refresh token"))
        }
    }
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // RequireJWT 已将用户放入请求扩展
    match tenancy::current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        Err(res) => Ok(res),
    }
}
