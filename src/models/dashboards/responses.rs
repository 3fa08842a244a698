use crate::define_string_enum;
use crate::models::directory::entities::Student;
use crate::models::exams::entities::{Exam, ExamAttempt};
use serde::Serialize;
use ts_rs::TS;

// 后台首页统计
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboards.ts")]
pub struct AdminDashboard {
    pub students: u64,
    pub new_inquiries: u64,
    pub draft_leads: u64,
    pub submitted_leads: u64,
    pub open_jobs: u64,
    pub outstanding_cents: i64,
    pub attempts_in_progress: u64,
    pub attempts_locked: u64,
}

// 家长视角的单个孩子
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboards.ts")]
pub struct ChildSummary {
    pub student: Student,
    pub label: String,
    pub outstanding_cents: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboards.ts")]
pub struct GuardianDashboard {
    pub guardian_name: String,
    pub children: Vec<ChildSummary>,
    pub children_label: String,
    pub outstanding_cents: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboards.ts")]
pub struct StudentDashboard {
    pub student: Student,
    pub label: String,
    pub upcoming_exams: Vec<Exam>,
    pub attempts: Vec<ExamAttempt>,
    pub outstanding_cents: i64,
}

define_string_enum! {
    /// 门户首页类型
    PortalDashboardKind, "../frontend/src/types/generated/dashboards.ts" {
        Guardian => "guardian",
        Student => "student",
    }
}

// 门户首页：按登录身份只填充其中一项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboards.ts")]
pub struct PortalDashboard {
    pub kind: PortalDashboardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian: Option<GuardianDashboard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentDashboard>,
}
