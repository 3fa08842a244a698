use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::LeadStatus;

// 开始申请请求（第一步）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct StartApplicationRequest {
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_email: String,
    pub guardian_phone: Option<String>,
    pub student_name: Option<String>,
    pub grade_applying: Option<i32>,
}

// 更新申请请求（通过恢复令牌定位）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct UpdateApplicationRequest {
    #[serde(default)]
    pub token: String,
    pub step: Option<i32>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
    pub student_name: Option<String>,
    pub student_birth_date: Option<chrono::NaiveDate>,
    pub grade_applying: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub submit: bool,
}

// 加载申请查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct LoadApplicationQuery {
    #[serde(default)]
    pub token: String,
}

// 招生线索列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct LeadListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<LeadStatus>,
}

// 招生线索列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct LeadListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<LeadStatus>,
}

impl From<LeadListParams> for LeadListQuery {
    fn from(params: LeadListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
        }
    }
}

// 存储层更新内容（已通过校验）
#[derive(Debug, Clone, Default)]
pub struct LeadChanges {
    pub step: Option<i32>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
    pub student_name: Option<String>,
    pub student_birth_date: Option<chrono::NaiveDate>,
    pub grade_applying: Option<i32>,
    pub notes: Option<String>,
    pub submit: bool,
}
