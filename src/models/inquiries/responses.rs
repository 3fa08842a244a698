use super::entities::Inquiry;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 咨询列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct InquiryListResponse {
    pub items: Vec<Inquiry>,
    pub pagination: PaginationInfo,
}
