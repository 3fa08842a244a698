//! 官网公开接口：咨询、入学申请、招聘
//!
//! 不需要登录，租户由 `X-School` 头或默认学校决定。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    admissions::requests::{LoadApplicationQuery, StartApplicationRequest, UpdateApplicationRequest},
    careers::requests::ApplyJobRequest,
    inquiries::requests::CreateInquiryRequest,
};
use crate::services::{AdmissionService, CareerService, InquiryService};
use crate::utils::SafeSlug;

static INQUIRY_SERVICE: Lazy<InquiryService> = Lazy::new(InquiryService::new_lazy);
static ADMISSION_SERVICE: Lazy<AdmissionService> = Lazy::new(AdmissionService::new_lazy);
static CAREER_SERVICE: Lazy<CareerService> = Lazy::new(CareerService::new_lazy);

pub async fn create_inquiry(
    req: HttpRequest,
    data: web::Json<CreateInquiryRequest>,
) -> ActixResult<HttpResponse> {
    INQUIRY_SERVICE.create_inquiry(&req, data.into_inner()).await
}

pub async fn start_application(
    req: HttpRequest,
    data: web::Json<StartApplicationRequest>,
) -> ActixResult<HttpResponse> {
    ADMISSION_SERVICE.start(&req, data.into_inner()).await
}

pub async fn update_application(
    req: HttpRequest,
    data: web::Json<UpdateApplicationRequest>,
) -> ActixResult<HttpResponse> {
    ADMISSION_SERVICE.update(&req, data.into_inner()).await
}

pub async fn load_application(
    req: HttpRequest,
    query: web::Query<LoadApplicationQuery>,
) -> ActixResult<HttpResponse> {
    ADMISSION_SERVICE.load(&req, query.into_inner()).await
}

pub async fn list_open_jobs(req: HttpRequest) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.list_open_jobs(&req).await
}

pub async fn get_open_job(req: HttpRequest, slug: SafeSlug) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.get_open_job(&req, &slug.0).await
}

pub async fn apply_job(
    req: HttpRequest,
    slug: SafeSlug,
    data: web::Json<ApplyJobRequest>,
) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.apply(&req, &slug.0, data.into_inner()).await
}

// 配置路由
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/inquiries")
            .wrap(middlewares::RateLimit::inquiry())
            .route(web::post().to(create_inquiry)),
    )
    .service(
        web::scope("/api/apply")
            .service(
                web::resource("/start")
                    .wrap(middlewares::RateLimit::apply_start())
                    .route(web::post().to(start_application)),
            )
            .route("/update", web::post().to(update_application))
            .route("/load", web::get().to(load_application)),
    )
    .service(
        web::scope("/api/careers")
            .route("", web::get().to(list_open_jobs))
            .route("/{slug}", web::get().to(get_open_job))
            .service(
                web::resource("/{slug}/apply")
                    .wrap(middlewares::RateLimit::career_apply())
                    .route(web::post().to(apply_job)),
            ),
    );
}
