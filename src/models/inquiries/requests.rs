use super::entities::InquiryStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 提交咨询请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct CreateInquiryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

// 咨询列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct InquiryListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<InquiryStatus>,
}

// 更新咨询状态请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct UpdateInquiryStatusRequest {
    pub status: InquiryStatus,
}

// 咨询列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct InquiryListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<InquiryStatus>,
}

impl From<InquiryListParams> for InquiryListQuery {
    fn from(params: InquiryListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
        }
    }
}
