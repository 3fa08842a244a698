use super::entities::BalanceStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 开具账单请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct CreateInvoiceRequest {
    pub student_id: i64,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub description: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: String,
    pub due_date: chrono::NaiveDate,
}

// 登记付款请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct RecordPaymentRequest {
    pub amount_cents: i64,
    #[serde(default = "default_method")]
    pub method: String,
    pub reference: Option<String>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_method() -> String {
    "manual".to_string()
}

// 账单列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct InvoiceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<BalanceStatus>,
    pub student_id: Option<i64>,
}

// 账单列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct InvoiceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<BalanceStatus>,
    pub student_id: Option<i64>,
}

impl From<InvoiceListParams> for InvoiceListQuery {
    fn from(params: InvoiceListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            student_id: params.student_id,
        }
    }
}
