use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 咨询处理状态
    InquiryStatus, "../frontend/src/types/generated/inquiry.ts" {
        New => "new",
        Read => "read",
        Archived => "archived",
    }
}

// 官网咨询留言
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/inquiry.ts")]
pub struct Inquiry {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
