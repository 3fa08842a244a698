use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use tracing::info;

use crate::cache::session_key;
use crate::models::{ApiResponse, auth::Area};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 清除当前令牌对应的会话缓存
async fn forget_session(service: &AuthService, request: &HttpRequest) {
    if let (Some(token), Some(cache)) = (
        JwtUtils::extract_session_token(request),
        service.get_cache(request),
    ) {
        cache.remove(&session_key(&token)).await;
    }
}

/// 处理用户登出
/// 通过设置空的 cookie 来清除客户端的登录状态
pub async fn handle_logout(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    forget_session(service, request).await;

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_session_cookie())
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}

/// 区域登出：清除登录状态后跳转到该区域的登录页
pub async fn handle_area_logout(
    service: &AuthService,
    request: &HttpRequest,
    area: Area,
) -> ActixResult<HttpResponse> {
    forget_session(service, request).await;
    info!("Signed out of {} area", area);

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, area.login_path()))
        .cookie(JwtUtils::create_empty_session_cookie())
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest};

    #[actix_web::test]
    async fn test_area_logout_redirects_to_login() {
        let req = TestRequest::get().uri("/portal/logout").to_http_request();
        let res = AuthService::new_lazy()
            .area_logout(&req, Area::Portal)
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            Area::Portal.login_path().as_str()
        );
        assert!(res.cookies().all(|c| c.value().is_empty()));
    }
}
