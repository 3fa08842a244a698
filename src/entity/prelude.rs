//! 预导入模块，方便使用

pub use super::admission_leads::{
    ActiveModel as AdmissionLeadActiveModel, Entity as AdmissionLeads, Model as AdmissionLeadModel,
};
pub use super::career_applications::{
    ActiveModel as CareerApplicationActiveModel, Entity as CareerApplications,
    Model as CareerApplicationModel,
};
pub use super::career_jobs::{
    ActiveModel as CareerJobActiveModel, Entity as CareerJobs, Model as CareerJobModel,
};
pub use super::exam_answers::{
    ActiveModel as ExamAnswerActiveModel, Entity as ExamAnswers, Model as ExamAnswerModel,
};
pub use super::exam_attempt_events::{
    ActiveModel as ExamAttemptEventActiveModel, Entity as ExamAttemptEvents,
    Model as ExamAttemptEventModel,
};
pub use super::exam_attempts::{
    ActiveModel as ExamAttemptActiveModel, Entity as ExamAttempts, Model as ExamAttemptModel,
};
pub use super::exam_questions::{
    ActiveModel as ExamQuestionActiveModel, Entity as ExamQuestions, Model as ExamQuestionModel,
};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::guardian_students::{
    ActiveModel as GuardianStudentActiveModel, Entity as GuardianStudents,
    Model as GuardianStudentModel,
};
pub use super::guardians::{
    ActiveModel as GuardianActiveModel, Entity as Guardians, Model as GuardianModel,
};
pub use super::inquiries::{
    ActiveModel as InquiryActiveModel, Entity as Inquiries, Model as InquiryModel,
};
pub use super::invoice_payments::{
    ActiveModel as InvoicePaymentActiveModel, Entity as InvoicePayments,
    Model as InvoicePaymentModel,
};
pub use super::invoices::{
    ActiveModel as InvoiceActiveModel, Entity as Invoices, Model as InvoiceModel,
};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
