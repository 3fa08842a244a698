pub mod admissions;
pub mod auth;
pub mod careers;
pub mod common;
pub mod dashboards;
pub mod directory;
pub mod exams;
pub mod finance;
pub mod inquiries;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery, page_bounds,
};

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
