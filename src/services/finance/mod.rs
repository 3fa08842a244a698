pub mod create;
pub mod list;
pub mod payments;
pub mod portal;
pub mod void;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::finance::requests::{
    CreateInvoiceRequest, InvoiceListParams, RecordPaymentRequest,
};
use crate::storage::Storage;

pub struct FinanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl FinanceService {
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

    // 后台账单余额列表
    pub async fn list_invoices(
        &self,
        request: &HttpRequest,
        query: InvoiceListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_invoices(self, request, query).await
    }

    // 开具账单
    pub async fn create_invoice(
        &self,
        request: &HttpRequest,
        req: CreateInvoiceRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_invoice(self, request, req).await
    }

    // 登记付款
    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        invoice_id: i64,
        req: RecordPaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::record_payment(self, request, invoice_id, req).await
    }

    // 作废账单
    pub async fn void_invoice(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        void::void_invoice(self, request, id).await
    }

    // 门户：家长/学生可见的账单
    pub async fn portal_invoices(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        portal::portal_invoices(self, request).await
    }
}
