use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 题目类型
    QuestionKind, "../frontend/src/types/generated/exams.ts" {
        Choice => "choice", // 选择题，自动判分
        Text => "text",     // 简答题，人工批改
    }
}

define_string_enum! {
    /// 答题记录状态
    AttemptStatus, "../frontend/src/types/generated/exams.ts" {
        InProgress => "in_progress",
        Locked => "locked",
        Submitted => "submitted",
    }
}

define_string_enum! {
    /// 答题事件类型
    AttemptEventKind, "../frontend/src/types/generated/exams.ts" {
        Started => "started",
        Locked => "locked",
        Unlocked => "unlocked",
        Submitted => "submitted",
    }
}

/// 状态迁移的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 执行迁移并记录事件
    Apply,
    /// 已处于目标状态，视为成功但不记录事件
    Noop,
    /// 当前状态不允许该操作
    Reject,
}

impl AttemptStatus {
    /// in_progress → locked
    pub fn on_lock(self) -> Transition {
        match self {
            AttemptStatus::InProgress => Transition::Apply,
            AttemptStatus::Locked => Transition::Noop,
            AttemptStatus::Submitted => Transition::Reject,
        }
    }

    /// locked → in_progress（监考解锁）
    pub fn on_unlock(self) -> Transition {
        match self {
            AttemptStatus::Locked => Transition::Apply,
            AttemptStatus::InProgress | AttemptStatus::Submitted => Transition::Reject,
        }
    }

    /// in_progress → submitted
    pub fn on_submit(self) -> Transition {
        match self {
            AttemptStatus::InProgress => Transition::Apply,
            AttemptStatus::Submitted => Transition::Noop,
            AttemptStatus::Locked => Transition::Reject,
        }
    }
}

/// 存储层执行状态迁移后的结果，附带迁移后（或当前）的答题记录
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    Applied(ExamAttempt),
    Unchanged(ExamAttempt),
    Rejected(ExamAttempt),
}

impl TransitionOutcome {
    pub fn attempt(&self) -> &ExamAttempt {
        match self {
            TransitionOutcome::Applied(a)
            | TransitionOutcome::Unchanged(a)
            | TransitionOutcome::Rejected(a) => a,
        }
    }
}

/// 保存答案的结果；答题记录已不在进行中时不写入
#[derive(Debug, Clone)]
pub enum AnswerOutcome {
    Saved(ExamAnswer),
    Closed(ExamAttempt),
}

// 考试
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct Exam {
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    pub grade_level: Option<i32>, // None 表示面向所有年级
    pub duration_minutes: i32,
    pub opens_at: chrono::DateTime<chrono::Utc>,
    pub closes_at: chrono::DateTime<chrono::Utc>,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Exam {
    pub fn is_open_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.published && self.opens_at <= now && now < self.closes_at
    }

    pub fn is_for_grade(&self, grade_level: i32) -> bool {
        self.grade_level.is_none_or(|g| g == grade_level)
    }

    /// 新答题记录的截止时间：开始时间加时长，且不晚于考试关闭时间
    pub fn deadline_from(
        &self,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> chrono::DateTime<chrono::Utc> {
        let by_duration = started_at + chrono::Duration::minutes(self.duration_minutes as i64);
        by_duration.min(self.closes_at)
    }
}

// 考试题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct ExamQuestion {
    pub id: i64,
    pub exam_id: i64,
    pub position: i32,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub points: i32,
}

impl ExamQuestion {
    /// 选择题的作答必须是选项之一
    pub fn accepts(&self, answer: &str) -> bool {
        match self.kind {
            QuestionKind::Choice => self.options.iter().any(|o| o == answer),
            QuestionKind::Text => true,
        }
    }
}

// 答题记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct ExamAttempt {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub status: AttemptStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub deadline_at: chrono::DateTime<chrono::Utc>,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub score: Option<i32>,
    pub max_score: Option<i32>,
}

impl ExamAttempt {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>, grace_seconds: i64) -> bool {
        now > self.deadline_at + chrono::Duration::seconds(grace_seconds)
    }
}

// 作答
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct ExamAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub answer: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 答题事件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exams.ts")]
pub struct AttemptEvent {
    pub id: i64,
    pub attempt_id: i64,
    pub kind: AttemptEventKind,
    pub reason: Option<String>,
    pub actor_user_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 选择题自动判分，返回 (得分, 满分)；简答题不计入
pub fn score_choice_questions(questions: &[ExamQuestion], answers: &[ExamAnswer]) -> (i32, i32) {
    questions
        .iter()
        .filter(|q| q.kind == QuestionKind::Choice)
        .fold((0, 0), |(score, max), q| {
            let correct = q.correct_answer.as_deref().is_some_and(|expected| {
                answers
                    .iter()
                    .any(|a| a.question_id == q.id && a.answer.trim() == expected.trim())
            });
            (score + if correct { q.points } else { 0 }, max + q.points)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn question(id: i64, kind: QuestionKind, correct: Option<&str>, points: i32) -> ExamQuestion {
        ExamQuestion {
            id,
            exam_id: 1,
            position: id as i32,
            prompt: format!("Q{id}"),
            kind,
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: correct.map(str::to_string),
            points,
        }
    }

    fn answer(question_id: i64, answer: &str) -> ExamAnswer {
        ExamAnswer {
            id: question_id,
            attempt_id: 1,
            question_id,
            answer: answer.into(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(AttemptStatus::InProgress.on_lock(), Transition::Apply);
        assert_eq!(AttemptStatus::Locked.on_lock(), Transition::Noop);
        assert_eq!(AttemptStatus::Submitted.on_lock(), Transition::Reject);

        assert_eq!(AttemptStatus::InProgress.on_submit(), Transition::Apply);
        assert_eq!(AttemptStatus::Submitted.on_submit(), Transition::Noop);
        assert_eq!(AttemptStatus::Locked.on_submit(), Transition::Reject);

        assert_eq!(AttemptStatus::Locked.on_unlock(), Transition::Apply);
        assert_eq!(AttemptStatus::InProgress.on_unlock(), Transition::Reject);
        assert_eq!(AttemptStatus::Submitted.on_unlock(), Transition::Reject);
    }

    #[test]
    fn test_scoring_ignores_text_questions() {
        let questions = vec![
            question(1, QuestionKind::Choice, Some("A"), 2),
            question(2, QuestionKind::Choice, Some("C"), 3),
            question(3, QuestionKind::Text, None, 5),
            question(4, QuestionKind::Choice, Some("B"), 1),
        ];
        let answers = vec![answer(1, "A"), answer(2, "B"), answer(3, "essay")];
        assert_eq!(score_choice_questions(&questions, &answers), (2, 6));
    }

    #[test]
    fn test_choice_answer_must_be_an_option() {
        let q = question(1, QuestionKind::Choice, Some("A"), 1);
        assert!(q.accepts("B"));
        assert!(!q.accepts("D"));
        assert!(question(2, QuestionKind::Text, None, 1).accepts("anything"));
    }

    #[test]
    fn test_exam_window_and_deadline() {
        let now = Utc::now();
        let exam = Exam {
            id: 1,
            school_id: 1,
            title: "Algebra".into(),
            grade_level: Some(7),
            duration_minutes: 60,
            opens_at: now - Duration::minutes(10),
            closes_at: now + Duration::minutes(30),
            published: true,
            created_at: now,
        };
        assert!(exam.is_open_at(now));
        assert!(!exam.is_open_at(now + Duration::minutes(31)));
        assert!(exam.is_for_grade(7));
        assert!(!exam.is_for_grade(8));
        // 时长超过关闭时间时以关闭时间为准
        assert_eq!(exam.deadline_from(now), exam.closes_at);
    }

    #[test]
    fn test_attempt_expiry_honours_grace() {
        let now = Utc::now();
        let attempt = ExamAttempt {
            id: 1,
            exam_id: 1,
            student_id: 1,
            status: AttemptStatus::InProgress,
            started_at: now - Duration::minutes(61),
            deadline_at: now - Duration::seconds(10),
            locked_at: None,
            submitted_at: None,
            score: None,
            max_score: None,
        };
        assert!(!attempt.is_expired(now, 30));
        assert!(attempt.is_expired(now, 5));
    }
}
