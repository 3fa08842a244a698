use super::entities::{AdmissionLead, LeadStatus};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 开始申请响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct StartApplicationResponse {
    pub token: String,
    pub step: i32,
}

// 申请人可见的申请内容（不含内部 ID）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct ApplicationView {
    pub step: i32,
    pub status: LeadStatus,
    pub guardian_name: String,
    pub guardian_email: String,
    pub guardian_phone: Option<String>,
    pub student_name: Option<String>,
    pub student_birth_date: Option<chrono::NaiveDate>,
    pub grade_applying: Option<i32>,
    pub notes: Option<String>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<AdmissionLead> for ApplicationView {
    fn from(lead: AdmissionLead) -> Self {
        Self {
            step: lead.step,
            status: lead.status,
            guardian_name: lead.guardian_name,
            guardian_email: lead.guardian_email,
            guardian_phone: lead.guardian_phone,
            student_name: lead.student_name,
            student_birth_date: lead.student_birth_date,
            grade_applying: lead.grade_applying,
            notes: lead.notes,
            submitted_at: lead.submitted_at,
        }
    }
}

// 招生线索列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/admissions.ts")]
pub struct LeadListResponse {
    pub items: Vec<AdmissionLead>,
    pub pagination: PaginationInfo,
}
