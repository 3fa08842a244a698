/*!
 * 会话认证中间件
 *
 * 验证请求携带的 access token（`Authorization: Bearer <jwt>` 或 `campus_session` Cookie），
 * 通过后将用户放入请求扩展。AccessGate 复用同一套会话解析逻辑。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/auth")
 *     .service(
 *         web::resource("/me")
 *             .wrap(RequireJWT)
 *             .route(web::get().to(me_handler)),
 *     )
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取令牌并校验签名、过期时间和类型
 * 2. 先查对象缓存（键 `session:<token>`），未命中再查数据库
 * 3. 用户不存在或非活跃状态视为未认证
 */

use crate::cache::{self, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

/// 会话解析失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 未携带令牌
    Missing,
    /// 令牌无效、过期或用户不可用
    Invalid(String),
    /// 服务端错误
    Internal(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Missing => f.write_str("Missing session token"),
            SessionError::Invalid(msg) | SessionError::Internal(msg) => f.write_str(msg),
        }
    }
}

/// 从请求中解析当前会话用户
pub async fn resolve_session_user(req: &HttpRequest) -> Result<User, SessionError> {
    let token = JwtUtils::extract_session_token(req).ok_or(SessionError::Missing)?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("Session token validation failed: {}", err);
        SessionError::Invalid("Invalid session token".to_string())
    })?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| SessionError::Invalid("Invalid user ID in token".to_string()))?;

    let object_cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    // 从缓存中获取用户信息
    if let Some(ref object_cache) = object_cache
        && let Some(user) =
            cache::get_json::<User>(object_cache.as_ref(), &cache::session_key(&token)).await
        && user.id == user_id
    {
        return Ok(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| SessionError::Internal("Storage not configured".to_string()))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load session user {}: {}", user_id, e);
            SessionError::Internal("Failed to retrieve user".to_string())
        })?
        .ok_or_else(|| SessionError::Invalid("User not found".to_string()))?;

    if !user.is_active() {
        return Err(SessionError::Invalid("User is not active".to_string()));
    }
    if user.school_id != claims.school_id {
        return Err(SessionError::Invalid("Token school mismatch".to_string()));
    }

    // 将用户信息存入缓存
    if let Some(object_cache) = object_cache {
        cache::insert_json(
            object_cache.as_ref(),
            cache::session_key(&token),
            &user,
            AppConfig::get().cache.default_ttl,
        )
        .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            match resolve_session_user(req.request()).await {
                Ok(user) => {
                    debug!("Session authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(SessionError::Internal(err)) => Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        &err,
                    )
                    .map_into_right_body(),
                )),
                Err(err) => {
                    info!(
                        "Session authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }
}
