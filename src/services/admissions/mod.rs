pub mod list;
pub mod load;
pub mod start;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::admissions::requests::{
    LeadListParams, LoadApplicationQuery, StartApplicationRequest, UpdateApplicationRequest,
};
use crate::storage::Storage;

pub struct AdmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdmissionService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 开始申请，返回恢复令牌
    pub async fn start(
        &self,
        request: &HttpRequest,
        req: StartApplicationRequest,
    ) -> ActixResult<HttpResponse> {
        start::start_application(self, request, req).await
    }

    // 按令牌保存某一步或最终提交
    pub async fn update(
        &self,
        request: &HttpRequest,
        req: UpdateApplicationRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_application(self, request, req).await
    }

    // 按令牌恢复申请
    pub async fn load(
        &self,
        request: &HttpRequest,
        query: LoadApplicationQuery,
    ) -> ActixResult<HttpResponse> {
        load::load_application(self, request, query).await
    }

    // 后台线索列表
    pub async fn list_leads(
        &self,
        request: &HttpRequest,
        query: LeadListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_leads(self, request, query).await
    }
}
