use super::entities::{ApplicationStatus, EmploymentType};
use serde::Deserialize;
use ts_rs::TS;

// 保存职位请求：带 id 为更新，否则新建
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct SaveJobRequest {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    pub slug: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: bool,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 存储层职位内容（slug 已确定）
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub title: String,
    pub slug: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub description: String,
    pub published: bool,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 投递申请请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct ApplyJobRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

// 更新申请状态请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}
