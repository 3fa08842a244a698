use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 用工类型
    EmploymentType, "../frontend/src/types/generated/careers.ts" {
        FullTime => "full_time",
        PartTime => "part_time",
        Contract => "contract",
        Internship => "internship",
    }
}

define_string_enum! {
    /// 职位申请处理状态
    ApplicationStatus, "../frontend/src/types/generated/careers.ts" {
        Received => "received",
        Reviewing => "reviewing",
        Shortlisted => "shortlisted",
        Rejected => "rejected",
        Hired => "hired",
    }
}

// 招聘职位
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct CareerJob {
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    pub slug: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub description: String,
    pub published: bool,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CareerJob {
    /// 已发布且未过截止时间
    pub fn is_open(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.published && self.closes_at.is_none_or(|closes| closes > now)
    }
}

// 职位申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/careers.ts")]
pub struct CareerApplication {
    pub id: i64,
    pub school_id: i64,
    pub job_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn job(published: bool, closes_at: Option<chrono::DateTime<Utc>>) -> CareerJob {
        let now = Utc::now();
        CareerJob {
            id: 1,
            school_id: 1,
            title: "Math Teacher".into(),
            slug: "math-teacher".into(),
            department: None,
            location: None,
            employment_type: EmploymentType::FullTime,
            description: "Teach mathematics to senior classes.".into(),
            published,
            closes_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_job_open_window() {
        let now = Utc::now();
        assert!(job(true, None).is_open(now));
        assert!(job(true, Some(now + Duration::days(1))).is_open(now));
        assert!(!job(true, Some(now - Duration::seconds(1))).is_open(now));
        assert!(!job(false, None).is_open(now));
    }
}
