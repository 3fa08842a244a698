use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::{Area, LoginRequest};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn admin_logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.area_logout(&request, Area::Admin).await
}

pub async fn portal_logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.area_logout(&request, Area::Portal).await
}

pub async fn conductor_logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.area_logout(&request, Area::Conductor).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(middlewares::RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .route("/logout", web::post().to(logout))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user)),
            ),
    );

    // 区域登出页，AccessGate 对其放行
    cfg.service(
        web::resource("/admin/logout")
            .route(web::get().to(admin_logout))
            .route(web::post().to(admin_logout)),
    )
    .service(
        web::resource("/portal/logout")
            .route(web::get().to(portal_logout))
            .route(web::post().to(portal_logout)),
    )
    .service(
        web::resource("/conductor/logout")
            .route(web::get().to(conductor_logout))
            .route(web::post().to(conductor_logout)),
    );
}
