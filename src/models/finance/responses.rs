use super::entities::{InvoiceBalance, InvoicePayment};
use serde::Serialize;
use ts_rs::TS;

// 登记付款后的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct PaymentResponse {
    pub payment: InvoicePayment,
    pub balance: InvoiceBalance,
}

// 家长/学生门户的账单汇总
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct PortalInvoicesResponse {
    pub items: Vec<InvoiceBalance>,
    pub outstanding_cents: i64,
}
