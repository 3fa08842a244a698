//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间字段统一保存为 Unix 秒。

pub mod prelude;

pub mod admission_leads;
pub mod career_applications;
pub mod career_jobs;
pub mod exam_answers;
pub mod exam_attempt_events;
pub mod exam_attempts;
pub mod exam_questions;
pub mod exams;
pub mod guardian_students;
pub mod guardians;
pub mod inquiries;
pub mod invoice_payments;
pub mod invoices;
pub mod schools;
pub mod students;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转 UTC 时间，越界值回退为纪元时间
pub(crate) fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
