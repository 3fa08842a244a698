pub mod create;
pub mod list;
pub mod update_status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::inquiries::requests::{
    CreateInquiryRequest, InquiryListParams, UpdateInquiryStatusRequest,
};
use crate::storage::Storage;

pub struct InquiryService {
    storage: Option<Arc<dyn Storage>>,
}

impl InquiryService {
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

    // 官网提交咨询
    pub async fn create_inquiry(
        &self,
        request: &HttpRequest,
        req: CreateInquiryRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_inquiry(self, request, req).await
    }

    // 后台咨询列表
    pub async fn list_inquiries(
        &self,
        request: &HttpRequest,
        query: InquiryListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_inquiries(self, request, query).await
    }

    // 更新咨询状态
    pub async fn update_status(
        &self,
        request: &HttpRequest,
        id: i64,
        req: UpdateInquiryStatusRequest,
    ) -> ActixResult<HttpResponse> {
        update_status::update_status(self, request, id, req).await
    }
}
