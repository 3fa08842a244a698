/*!
 * 区域访问中间件
 *
 * 包在整个应用外层，按路径前缀把请求归入受保护区域：
 *
 * | 区域 | 页面前缀 | 接口前缀 |
 * |------|----------|----------|
 * | 后台 | `/admin` | `/api/admin` |
 * | 门户 | `/portal` | `/api/portal` |
 * | 监考台 | `/conductor` | `/api/conductor` |
 *
 * 前缀按路径段匹配，`/administrator` 不属于后台。登录、注销页与 `/unauthorized`
 * 直接放行。
 *
 * 页面请求未登录时重定向到对应登录页（带 `next`），无权限时重定向到
 * `/unauthorized`；JSON 请求返回 401 / 403 响应体。
 *
 * 通过后在请求扩展中放入 [`User`] 与 [`SessionUser`]。
 */

use crate::models::ErrorCode;
use crate::models::auth::entities::{Area, PortalSubject, SessionUser};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode, header},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;
use super::require_jwt::{SessionError, resolve_session_user};

pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

#[derive(Clone)]
pub struct AccessGate;

/// 路径是否等于前缀或位于其下一级
fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// 按路径判断所属区域
pub fn classify_path(path: &str) -> Option<Area> {
    Area::ALL.iter().copied().find(|area| {
        has_segment_prefix(path, area.page_prefix()) || has_segment_prefix(path, area.api_prefix())
    })
}

/// 无需登录即可访问的路径
pub fn is_exempt_path(path: &str) -> bool {
    if has_segment_prefix(path, UNAUTHORIZED_PATH) {
        return true;
    }
    Area::ALL.iter().any(|area| {
        let page = area.page_prefix();
        has_segment_prefix(path, &format!("{page}/login"))
            || has_segment_prefix(path, &format!("{page}/logout"))
    })
}

/// 是否按 JSON 接口处理（否则按页面处理）
pub fn wants_json(req: &HttpRequest) -> bool {
    if has_segment_prefix(req.path(), "/api") {
        return true;
    }
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return true;
    }
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// 登录页地址，`next` 为原始路径与查询串
pub fn login_redirect_location(area: Area, req: &HttpRequest) -> String {
    let target = match req.uri().query() {
        Some(query) if !query.is_empty() => format!("{}?{}", req.path(), query),
        _ => req.path().to_string(),
    };
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{}?next={}", area.login_path(), encoded)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// 区域判定结果
enum Verdict {
    Allowed(SessionUser),
    Unauthenticated(String),
    Forbidden(String),
    Failed(String),
}

/// 门户身份：学生本人或关联了学生的监护人
async fn resolve_portal_subject(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> crate::errors::Result<Option<PortalSubject>> {
    match user.role {
        UserRole::Student => Ok(storage
            .get_student_by_user_id(user.id)
            .await?
            .filter(|s| s.school_id == user.school_id)
            .map(PortalSubject::Student)),
        UserRole::Guardian => {
            let Some(guardian) = storage
                .get_guardian_by_user_id(user.id)
                .await?
                .filter(|g| g.school_id == user.school_id)
            else {
                return Ok(None);
            };
            let students = storage.list_guardian_students(guardian.id).await?;
            if students.is_empty() {
                return Ok(None);
            }
            Ok(Some(PortalSubject::Guardian { guardian, students }))
        }
        _ => Ok(None),
    }
}

async fn evaluate(req: &HttpRequest, area: Area) -> Verdict {
    let user = match resolve_session_user(req).await {
        Ok(user) => user,
        Err(SessionError::Internal(err)) => return Verdict::Failed(err),
        Err(err) => return Verdict::Unauthenticated(err.to_string()),
    };

    if !user.role.is_one_of(area.allowed_roles()) {
        return Verdict::Forbidden(format!("Role {} cannot access {}", user.role, area));
    }

    let subject = if area == Area::Portal {
        let Some(storage) = req
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .map(|s| s.get_ref().clone())
        else {
            return Verdict::Failed("Storage not configured".to_string());
        };
        match resolve_portal_subject(&storage, &user).await {
            Ok(Some(subject)) => Some(subject),
            Ok(None) => {
                return Verdict::Forbidden("No linked student record".to_string());
            }
            Err(e) => {
                error!("Failed to resolve portal subject for {}: {}", user.id, e);
                return Verdict::Failed("Failed to resolve portal access".to_string());
            }
        }
    } else {
        None
    };

    Verdict::Allowed(SessionUser {
        user,
        area,
        subject,
    })
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
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
            let area = match classify_path(req.path()) {
                Some(area)
                    if req.method() != Method::OPTIONS && !is_exempt_path(req.path()) =>
                {
                    area
                }
                _ => {
                    let res = srv.call(req).await?.map_into_left_body();
                    return Ok(res);
                }
            };

            let json = wants_json(req.request());
            let response = match evaluate(req.request(), area).await {
                Verdict::Allowed(session) => {
                    debug!(
                        "Access granted to {} for user {} ({})",
                        req.path(),
                        session.user.id,
                        session.user.role
                    );
                    req.extensions_mut().insert(session.user.clone());
                    req.extensions_mut().insert(session);
                    let res = srv.call(req).await?.map_into_left_body();
                    return Ok(res);
                }
                Verdict::Unauthenticated(reason) => {
                    info!("Unauthenticated request to {}: {}", req.path(), reason);
                    if json {
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                    } else {
                        redirect(&login_redirect_location(area, req.request()))
                    }
                }
                Verdict::Forbidden(reason) => {
                    info!("Forbidden request to {}: {}", req.path(), reason);
                    if json {
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied",
                        )
                    } else {
                        redirect(UNAUTHORIZED_PATH)
                    }
                }
                Verdict::Failed(reason) => create_error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    &reason,
                ),
            };

            Ok(req.into_response(response.map_into_right_body()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::directory::requests::{CreateGuardianRequest, CreateStudentRequest};
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::create_memory_storage;
    use crate::utils::jwt::JwtUtils;
    use actix_web::test::{TestRequest, call_service, init_service};
    use actix_web::{App, HttpResponse as Resp};

    async fn ok() -> Resp {
        Resp::Ok().body("ok")
    }

    fn user_request(email: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: "hashed".to_string(),
            role,
            display_name: None,
            student_id: None,
            guardian_id: None,
        }
    }

    #[test]
    fn test_classify_respects_segment_boundary() {
        assert_eq!(classify_path("/admin"), Some(Area::Admin));
        assert_eq!(classify_path("/admin/finance"), Some(Area::Admin));
        assert_eq!(classify_path("/api/admin/inquiries"), Some(Area::Admin));
        assert_eq!(classify_path("/portal/exams/lock"), Some(Area::Portal));
        assert_eq!(classify_path("/api/conductor"), Some(Area::Conductor));
        assert_eq!(classify_path("/administrator"), None);
        assert_eq!(classify_path("/portals"), None);
        assert_eq!(classify_path("/api/inquiries"), None);
        assert_eq!(classify_path("/"), None);
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt_path("/admin/login"));
        assert!(is_exempt_path("/portal/logout"));
        assert!(is_exempt_path("/conductor/login/reset"));
        assert!(is_exempt_path("/unauthorized"));
        assert!(!is_exempt_path("/admin/loginx"));
        assert!(!is_exempt_path("/admin"));
    }

    #[test]
    fn test_wants_json() {
        let req = TestRequest::get().uri("/admin/finance").to_http_request();
        assert!(!wants_json(&req));
        let req = TestRequest::get().uri("/api/admin/finance").to_http_request();
        assert!(wants_json(&req));
        let req = TestRequest::post().uri("/portal/exams/lock").to_http_request();
        assert!(wants_json(&req));
        let req = TestRequest::get()
            .uri("/portal/exams/list")
            .insert_header(("Accept", "application/json"))
            .to_http_request();
        assert!(wants_json(&req));
    }

    #[test]
    fn test_login_redirect_encodes_next() {
        let req = TestRequest::get()
            .uri("/admin/finance?tab=open&page=2")
            .to_http_request();
        assert_eq!(
            login_redirect_location(Area::Admin, &req),
            "/admin/login?next=%2Fadmin%2Ffinance%3Ftab%3Dopen%26page%3D2"
        );
    }

    #[actix_web::test]
    async fn test_unauthenticated_page_redirects_and_api_gets_401() {
        let storage = create_memory_storage().await;
        let app = init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .wrap(AccessGate)
                .default_service(web::to(ok)),
        )
        .await;

        let res = call_service(
            &app,
            TestRequest::get().uri("/admin/students?q=ada").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/admin/login?next=%2Fadmin%2Fstudents%3Fq%3Dada"
        );

        let res = call_service(
            &app,
            TestRequest::get().uri("/api/admin/dashboard").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        for path in ["/admin/login", "/portal/logout", "/administrator", "/unauthorized"] {
            let res = call_service(&app, TestRequest::get().uri(path).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{path} should pass through");
        }
    }

    #[actix_web::test]
    async fn test_role_and_portal_link_checks() {
        let storage = create_memory_storage().await;
        let school = storage.ensure_school("gate", "Gate School").await.unwrap();

        let finance = storage
            .create_user(school.id, user_request("fin@example.com", UserRole::Finance))
            .await
            .unwrap();
        let student = storage
            .create_student(
                school.id,
                CreateStudentRequest {
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    grade_level: 5,
                    admission_no: "A-1".to_string(),
                },
            )
            .await
            .unwrap();
        let guardian = storage
            .create_guardian(
                school.id,
                CreateGuardianRequest {
                    full_name: "Ann Parent".to_string(),
                    email: None,
                    phone: None,
                    student_ids: vec![],
                    relationship: None,
                },
            )
            .await
            .unwrap();
        let lonely_guardian = storage
            .create_user(
                school.id,
                CreateUserRequest {
                    guardian_id: Some(guardian.guardian.id),
                    ..user_request("parent@example.com", UserRole::Guardian)
                },
            )
            .await
            .unwrap();
        let student_user = storage
            .create_user(
                school.id,
                CreateUserRequest {
                    student_id: Some(student.id),
                    ..user_request("ada@example.com", UserRole::Student)
                },
            )
            .await
            .unwrap();

        let app = init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .wrap(AccessGate)
                .default_service(web::to(ok)),
        )
        .await;

        let bearer = |user: &User| {
            let token = JwtUtils::generate_access_token(user.id, user.school_id, user.role.as_str())
                .unwrap();
            ("Authorization", format!("Bearer {token}"))
        };

        // 财务可进后台，不能进监考台
        let res = call_service(
            &app,
            TestRequest::get()
                .uri("/admin/finance")
                .insert_header(bearer(&finance))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = call_service(
            &app,
            TestRequest::get()
                .uri("/conductor")
                .insert_header(bearer(&finance))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            UNAUTHORIZED_PATH
        );

        // 没有关联学生的监护人
        let res = call_service(
            &app,
            TestRequest::get()
                .uri("/api/portal/dashboard")
                .insert_header(bearer(&lonely_guardian))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = call_service(
            &app,
            TestRequest::post()
                .uri("/portal/exams/lock")
                .insert_header(bearer(&student_user))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
