/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 或 AccessGate 之后使用，在区域准入之上进一步限定角色，
 * 例如后台的财务接口只允许管理员和财务。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::{AccessGate, RequireRole};
 * use crate::models::users::entities::UserRole;
 *
 * App::new()
 *     .wrap(AccessGate) // 区域准入
 *     .service(
 *         web::scope("/api/admin/finance")
 *             .wrap(RequireRole::new_any(UserRole::finance_roles())) // 任一角色即可
 *             .route("/invoices", web::get().to(list_invoices)),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    middlewares::RequireJWT,
    models::{
        ErrorCode,
        users::entities::{self, UserRole},
    },
};

use super::create_error_response;

/// 会话用户的角色必须在列表中
#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            // 从请求扩展中获取会话用户
            let user = req.extensions().get::<entities::User>().cloned();

            match user {
                Some(user) => {
                    let user_sub = user.id;
                    let user_role = RequireJWT::extract_user_role(req.request());
                    let has_permission =
                        user_role.is_some_and(|role| required_roles.contains(&role));

                    if has_permission {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (role: {:?}). Required roles: {:?}",
                            user_sub, user_role, required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Access denied",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check failed: No user claims found in request. RequireJWT or AccessGate must run first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserStatus};
    use actix_web::test::{TestRequest, call_service, init_service};
    use actix_web::{App, HttpResponse, web};

    fn user_with(role: UserRole) -> User {
        User {
            id: 1,
            school_id: 1,
            email: "u@example.com".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[actix_web::test]
    async fn test_any_role_refinement() {
        let app = init_service(
            App::new().service(
                web::resource("/finance")
                    .wrap(RequireRole::new_any(UserRole::finance_roles()))
                    // 模拟上游认证：按 X-Role 头放入会话用户
                    .wrap_fn(|req, srv| {
                        let role = req
                            .headers()
                            .get("X-Role")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<UserRole>().ok());
                        if let Some(role) = role {
                            req.extensions_mut().insert(user_with(role));
                        }
                        srv.call(req)
                    })
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for (role, expected) in [
            ("finance", StatusCode::OK),
            ("admin", StatusCode::OK),
            ("staff", StatusCode::FORBIDDEN),
        ] {
            let req = TestRequest::get()
                .uri("/finance")
                .insert_header(("X-Role", role))
                .to_request();
            let res = call_service(&app, req).await;
            assert_eq!(res.status(), expected, "role {role}");
        }

        let req = TestRequest::get().uri("/finance").to_request();
        let res = call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
