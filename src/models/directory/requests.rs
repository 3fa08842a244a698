use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 创建学生请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub grade_level: i32,
    pub admission_no: String,
}

// 创建监护人请求（同时建立与学生的关联）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct CreateGuardianRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<i64>,
    pub relationship: Option<String>,
}

// 学生列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub grade_level: Option<i32>,
    pub search: Option<String>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub grade_level: Option<i32>,
    pub search: Option<String>,
}

impl From<StudentListParams> for StudentListQuery {
    fn from(params: StudentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            grade_level: params.grade_level,
            search: params.search,
        }
    }
}
