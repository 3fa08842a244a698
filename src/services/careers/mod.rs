pub mod applications;
pub mod apply;
pub mod delete;
pub mod list;
pub mod save;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::careers::requests::{
    ApplyJobRequest, SaveJobRequest, UpdateApplicationStatusRequest,
};
use crate::storage::Storage;

pub struct CareerService {
    storage: Option<Arc<dyn Storage>>,
}

impl CareerService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 新建或更新职位
    pub async fn save_job(
        &self,
        request: &HttpRequest,
        req: SaveJobRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_job(self, request, req).await
    }

    // 后台职位列表（含未发布）
    pub async fn list_jobs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_jobs(self, request).await
    }

    // 官网职位列表
    pub async fn list_open_jobs(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_open_jobs(self, request).await
    }

    // 官网职位详情
    pub async fn get_open_job(&self, request: &HttpRequest, slug: &str) -> ActixResult<HttpResponse> {
        list::get_open_job(self, request, slug).await
    }

    pub async fn delete_job(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_job(self, request, id).await
    }

    // 投递职位
    pub async fn apply(
        &self,
        request: &HttpRequest,
        slug: &str,
        req: ApplyJobRequest,
    ) -> ActixResult<HttpResponse> {
        apply::apply_to_job(self, request, slug, req).await
    }

    pub async fn list_applications(
        &self,
        request: &HttpRequest,
        job_id: i64,
    ) -> ActixResult<HttpResponse> {
        applications::list_applications(self, request, job_id).await
    }

    pub async fn update_application_status(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateApplicationStatusRequest,
    ) -> ActixResult<HttpResponse> {
        applications::update_application_status(self, request, id, req).await
    }
}
