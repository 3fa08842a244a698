use super::entities::{AttemptStatus, QuestionKind};
use serde::Deserialize;
use ts_rs::TS;

// 开始（或继续）考试
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct StartExamRequest {
    pub exam_id: i64,
}

// 保存作答
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct SaveAnswerRequest {
    pub attempt_id: i64,
    pub question_id: i64,
    #[serde(default)]
    pub answer: String,
}

// 锁定答题（切屏、离开等）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct LockAttemptRequest {
    pub attempt_id: i64,
    pub reason: Option<String>,
}

// 交卷
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct SubmitAttemptRequest {
    pub attempt_id: i64,
}

// 监考解锁
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct UnlockAttemptRequest {
    pub attempt_id: i64,
    pub reason: Option<String>,
}

// 答题详情查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptQuery {
    pub attempt_id: i64,
}

// 监考台答题列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptListParams {
    pub exam_id: Option<i64>,
    pub status: Option<AttemptStatus>,
}

// 创建题目
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct CreateQuestionRequest {
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    1
}

// 创建考试（含题目）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct CreateExamRequest {
    pub title: String,
    pub grade_level: Option<i32>,
    pub duration_minutes: i32,
    pub opens_at: chrono::DateTime<chrono::Utc>,
    pub closes_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
}
