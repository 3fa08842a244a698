pub mod admissions;
pub mod auth;
pub mod careers;
pub mod dashboards;
pub mod directory;
pub mod exams;
pub mod finance;
pub mod inquiries;
pub mod tenancy;

pub use admissions::AdmissionService;
pub use auth::AuthService;
pub use careers::CareerService;
pub use dashboards::DashboardService;
pub use directory::DirectoryService;
pub use exams::ExamService;
pub use finance::FinanceService;
pub use inquiries::InquiryService;
