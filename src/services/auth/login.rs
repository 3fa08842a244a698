use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::tenancy;
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Email or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 解析租户
    let school = match tenancy::resolve_school(&storage, request).await {
        Ok(school) => school,
        Err(res) => return Ok(res),
    };

    let email = login_request.email.trim().to_lowercase();
    if email.is_empty() || login_request.password.is_empty() {
        return Ok(tenancy::bad_request(
            ErrorCode::BadRequest,
            "Email and password are required",
        ));
    }

    // 2. 在本校内按邮箱查找用户
    let user = match storage.get_user_by_email(school.id, &email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => {
            error!("Failed to load user for login: {}", e);
            return Ok(tenancy::internal_error("Login failed"));
        }
    };

    // 3. 验证密码与账号状态
    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(auth_failed());
    }
    if !user.is_active() {
        warn!("Login rejected for inactive user {}", user.id);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Account is disabled",
        )));
    }

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 5. 生成令牌对
    let token_pair = match user.generate_token_pair(
        login_request
            .remember_me
            .then(|| chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry)),
    ) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            return Ok(tenancy::internal_error(
                "Login failed, unable to generate token",
            ));
        }
    };

    info!(
        "User {} logged in to school {}",
        user.id, school.slug
    );

    let session_cookie = jwt::JwtUtils::create_session_cookie(&token_pair.access_token);
    let refresh_cookie = jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(session_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::services::test_support::{public_request, read_json};
    use crate::storage::create_memory_storage;
    use crate::utils::jwt::{REFRESH_COOKIE, SESSION_COOKIE};
    use crate::utils::password::hash_password;
    use actix_web::http::StatusCode;

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    #[actix_web::test]
    async fn test_login_is_scoped_to_school() {
        let storage = create_memory_storage().await;
        let north = storage.ensure_school("north", "North").await.unwrap();
        storage.ensure_school("south", "South").await.unwrap();
        storage
            .create_user(
                north.id,
                CreateUserRequest {
                    email: "staff@example.com".into(),
                    password: hash_password("Campus2026x").unwrap(),
                    role: UserRole::Staff,
                    display_name: None,
                    student_id: None,
                    guardian_id: None,
                },
            )
            .await
            .unwrap();
        let service = AuthService::new_lazy();

        let res = service
            .login(
                login("Staff@Example.com", "Campus2026x"),
                &public_request(&storage, "north"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cookies: Vec<String> = res.cookies().map(|c| c.name().to_string()).collect();
        assert!(cookies.contains(&SESSION_COOKIE.to_string()));
        assert!(cookies.contains(&REFRESH_COOKIE.to_string()));
        let body = read_json(res).await;
        assert_eq!(body["data"]["user"]["email"], "staff@example.com");

        let res = service
            .login(
                login("staff@example.com", "Campus2026x"),
                &public_request(&storage, "south"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = service
            .login(
                login("staff@example.com", "wrong-password"),
                &public_request(&storage, "north"),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
