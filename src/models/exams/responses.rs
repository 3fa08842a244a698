use super::entities::{
    AttemptEvent, AttemptStatus, Exam, ExamAnswer, ExamAttempt, ExamQuestion, QuestionKind,
};
use serde::Serialize;
use ts_rs::TS;

// 学生可见的考试条目
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct StudentExamItem {
    pub exam: Exam,
    pub attempt_id: Option<i64>,
    pub attempt_status: Option<AttemptStatus>,
    pub is_open: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct StudentExamListResponse {
    pub items: Vec<StudentExamItem>,
}

// 学生作答时看到的题目（不含正确答案）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct PublicQuestion {
    pub id: i64,
    pub position: i32,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub points: i32,
}

impl From<ExamQuestion> for PublicQuestion {
    fn from(q: ExamQuestion) -> Self {
        Self {
            id: q.id,
            position: q.position,
            prompt: q.prompt,
            kind: q.kind,
            options: q.options,
            points: q.points,
        }
    }
}

// 答题详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptDetailResponse {
    pub exam: Exam,
    pub attempt: ExamAttempt,
    pub questions: Vec<PublicQuestion>,
    pub answers: Vec<ExamAnswer>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptResponse {
    pub attempt: ExamAttempt,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AnswerResponse {
    pub answer: ExamAnswer,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptListResponse {
    pub items: Vec<ExamAttempt>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptEventListResponse {
    pub attempt: ExamAttempt,
    pub items: Vec<AttemptEvent>,
}

// 后台考试详情（含正确答案）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct ExamDetailResponse {
    pub exam: Exam,
    pub questions: Vec<ExamQuestion>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct ExamListResponse {
    pub items: Vec<Exam>,
}
