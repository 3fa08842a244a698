use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 招生申请状态
    LeadStatus, "../frontend/src/types/generated/admissions.ts" {
        Draft => "draft",
        Submitted => "submitted",
    }
}

// 招生线索（多步骤申请表）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct AdmissionLead {
    pub id: i64,
    pub school_id: i64,
    #[serde(skip_serializing, default)] // 恢复令牌只在创建时下发
    #[ts(skip)]
    pub resume_token: String,
    pub step: i32,
    pub status: LeadStatus,
    pub guardian_name: String,
    pub guardian_email: String,
    pub guardian_phone: Option<String>,
    pub student_name: Option<String>,
    pub student_birth_date: Option<chrono::NaiveDate>,
    pub grade_applying: Option<i32>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AdmissionLead {
    pub fn is_submitted(&self) -> bool {
        self.status == LeadStatus::Submitted
    }

    /// 草稿超过保留期后不可再恢复
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>, ttl_days: i64) -> bool {
        !self.is_submitted() && now - self.updated_at > chrono::Duration::days(ttl_days)
    }
}
