use super::entities::{Guardian, GuardianLink, Student};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 学生列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

// 监护人详情（含关联学生）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct GuardianResponse {
    pub guardian: Guardian,
    pub links: Vec<GuardianLink>,
}
