use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 创建登录账号请求（后台）
//
// 学生账号需关联 student_id，家长账号需关联 guardian_id
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub student_id: Option<i64>,
    pub guardian_id: Option<i64>,
}
