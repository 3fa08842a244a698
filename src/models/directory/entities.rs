use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::utils::labels;

// 学校（租户）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct School {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub grade_level: i32,
    pub admission_no: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        labels::full_name(&self.first_name, &self.last_name)
    }

    /// 展示用标签，如 "Ada Lovelace · Grade 5"
    pub fn display_label(&self) -> String {
        labels::student_label(&self.first_name, &self.last_name, self.grade_level)
    }
}

// 监护人
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct Guardian {
    pub id: i64,
    pub school_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 监护人与学生的关联
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/directory.ts")]
pub struct GuardianLink {
    pub guardian_id: i64,
    pub student_id: i64,
    pub relationship: Option<String>,
}
