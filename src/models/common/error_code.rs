use serde::Serialize;

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 5000,

    // 认证与租户
    AuthFailed = 2000,
    SchoolNotFound = 2001,
    UserNotFound = 2002,
    UserAlreadyExists = 2003,
    UserInvalid = 2004,

    // 咨询
    InquiryInvalid = 3000,
    InquiryNotFound = 3001,

    // 招生
    LeadNotFound = 3100,
    LeadInvalid = 3101,
    LeadAlreadySubmitted = 3102,
    LeadExpired = 3103,

    // 招聘
    JobNotFound = 3200,
    JobInvalid = 3201,
    JobClosed = 3202,
    JobSlugTaken = 3203,
    ApplicationInvalid = 3204,
    ApplicationNotFound = 3205,

    // 财务
    InvoiceNotFound = 3300,
    InvoiceInvalid = 3301,
    InvoiceNumberTaken = 3302,
    PaymentInvalid = 3303,
    InvoiceVoid = 3304,

    // 考试
    ExamNotFound = 3400,
    ExamNotOpen = 3401,
    ExamInvalid = 3402,
    AttemptNotFound = 3403,
    AttemptLocked = 3404,
    AttemptSubmitted = 3405,
    AttemptExpired = 3406,
    AttemptNotLocked = 3407,
    QuestionNotFound = 3408,
    AnswerInvalid = 3409,

    // 学籍
    StudentNotFound = 3500,
    StudentInvalid = 3501,
    GuardianNotFound = 3502,
    GuardianInvalid = 3503,
}
