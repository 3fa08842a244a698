//! 考试、答题与监考存储操作
//!
//! 状态流转在单个事务内完成：带原状态条件的 UPDATE 只会有一个请求成功，
//! 成功的请求才写入事件，因此每次流转只产生一条事件记录。

use super::{SeaOrmStorage, query_error, write_error};
use crate::entity::exam_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as ExamAnswers,
};
use crate::entity::exam_attempt_events::{
    ActiveModel as EventActiveModel, Column as EventColumn, Entity as ExamAttemptEvents,
};
use crate::entity::exam_attempts::{
    ActiveModel as AttemptActiveModel, Column as AttemptColumn, Entity as ExamAttempts,
};
use crate::entity::exam_questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as ExamQuestions,
};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::errors::{CampusError, Result};
use crate::models::exams::{
    entities::{
        AnswerOutcome, AttemptEvent, AttemptEventKind, AttemptStatus, Exam, ExamAnswer,
        ExamAttempt, ExamQuestion, Transition, TransitionOutcome, score_choice_questions,
    },
    requests::{AttemptListParams, CreateExamRequest},
    responses::ExamDetailResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr, sea_query::OnConflict,
};
use tracing::info;

/// 一次状态流转的规则
struct TransitionPlan {
    guard: fn(AttemptStatus) -> Transition,
    to: AttemptStatus,
    event: AttemptEventKind,
}

const LOCK: TransitionPlan = TransitionPlan {
    guard: AttemptStatus::on_lock,
    to: AttemptStatus::Locked,
    event: AttemptEventKind::Locked,
};

const SUBMIT: TransitionPlan = TransitionPlan {
    guard: AttemptStatus::on_submit,
    to: AttemptStatus::Submitted,
    event: AttemptEventKind::Submitted,
};

const UNLOCK: TransitionPlan = TransitionPlan {
    guard: AttemptStatus::on_unlock,
    to: AttemptStatus::InProgress,
    event: AttemptEventKind::Unlocked,
};

async fn find_attempt<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<ExamAttempt>> {
    let result = ExamAttempts::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| query_error("查询答题记录失败", e))?;

    Ok(result.map(|m| m.into_attempt()))
}

/// 在事务内读取答题记录并加行锁（SQLite 下为整库写锁，无需 FOR UPDATE）
async fn lock_attempt<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<ExamAttempt>> {
    let result = ExamAttempts::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| query_error("锁定答题记录失败", e))?;

    Ok(result.map(|m| m.into_attempt()))
}

async fn questions_of<C: ConnectionTrait>(conn: &C, exam_id: i64) -> Result<Vec<ExamQuestion>> {
    let questions = ExamQuestions::find()
        .filter(QuestionColumn::ExamId.eq(exam_id))
        .order_by_asc(QuestionColumn::Position)
        .order_by_asc(QuestionColumn::Id)
        .all(conn)
        .await
        .map_err(|e| query_error("查询考题失败", e))?;

    Ok(questions.into_iter().map(|m| m.into_question()).collect())
}

async fn answers_of<C: ConnectionTrait>(conn: &C, attempt_id: i64) -> Result<Vec<ExamAnswer>> {
    let answers = ExamAnswers::find()
        .filter(AnswerColumn::AttemptId.eq(attempt_id))
        .order_by_asc(AnswerColumn::QuestionId)
        .all(conn)
        .await
        .map_err(|e| query_error("查询答案失败", e))?;

    Ok(answers.into_iter().map(|m| m.into_answer()).collect())
}

async fn record_event<C: ConnectionTrait>(
    conn: &C,
    attempt_id: i64,
    kind: AttemptEventKind,
    actor_user_id: Option<i64>,
    reason: Option<String>,
) -> Result<()> {
    EventActiveModel {
        attempt_id: Set(attempt_id),
        kind: Set(kind.to_string()),
        reason: Set(reason),
        actor_user_id: Set(actor_user_id),
        created_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| write_error("记录答题事件失败", e))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建考试及其题目，题目顺序即请求中的顺序
    pub async fn create_exam_impl(
        &self,
        school_id: i64,
        req: CreateExamRequest,
    ) -> Result<ExamDetailResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        let exam = ActiveModel {
            school_id: Set(school_id),
            title: Set(req.title),
            grade_level: Set(req.grade_level),
            duration_minutes: Set(req.duration_minutes),
            opens_at: Set(req.opens_at.timestamp()),
            closes_at: Set(req.closes_at.timestamp()),
            published: Set(req.published),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建考试失败", e))?;

        let mut questions = Vec::with_capacity(req.questions.len());
        for (index, q) in req.questions.into_iter().enumerate() {
            let options = if q.options.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&q.options)?)
            };
            let question = QuestionActiveModel {
                exam_id: Set(exam.id),
                position: Set(index as i32 + 1),
                prompt: Set(q.prompt),
                kind: Set(q.kind.to_string()),
                options: Set(options),
                correct_answer: Set(q.correct_answer),
                points: Set(q.points),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| write_error("创建考题失败", e))?;
            questions.push(question.into_question());
        }

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        Ok(ExamDetailResponse {
            exam: exam.into_exam(),
            questions,
        })
    }

    pub async fn list_exams_impl(&self, school_id: i64) -> Result<Vec<Exam>> {
        let exams = Exams::find()
            .filter(Column::SchoolId.eq(school_id))
            .order_by_desc(Column::OpensAt)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询考试列表失败", e))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    pub async fn get_exam_impl(&self, school_id: i64, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询考试失败", e))?;

        Ok(result.map(|m| m.into_exam()))
    }

    pub async fn list_exam_questions_impl(&self, exam_id: i64) -> Result<Vec<ExamQuestion>> {
        questions_of(&self.db, exam_id).await
    }

    pub async fn list_student_exams_impl(
        &self,
        school_id: i64,
        grade_level: i32,
    ) -> Result<Vec<Exam>> {
        let exams = Exams::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Published.eq(true))
            .filter(
                Condition::any()
                    .add(Column::GradeLevel.is_null())
                    .add(Column::GradeLevel.eq(grade_level)),
            )
            .order_by_asc(Column::OpensAt)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询考试列表失败", e))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    pub async fn list_student_attempts_impl(&self, student_id: i64) -> Result<Vec<ExamAttempt>> {
        let attempts = ExamAttempts::find()
            .filter(AttemptColumn::StudentId.eq(student_id))
            .order_by_desc(AttemptColumn::StartedAt)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询答题记录失败", e))?;

        Ok(attempts.into_iter().map(|m| m.into_attempt()).collect())
    }

    /// 开始或恢复答题
    ///
    /// 每个学生每场考试只有一条答题记录，已存在时直接返回。
    pub async fn start_exam_attempt_impl(
        &self,
        exam: &Exam,
        student_id: i64,
    ) -> Result<ExamAttempt> {
        let existing = ExamAttempts::find()
            .filter(AttemptColumn::ExamId.eq(exam.id))
            .filter(AttemptColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询答题记录失败", e))?;
        if let Some(existing) = existing {
            return Ok(existing.into_attempt());
        }

        let now = chrono::Utc::now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        let inserted = AttemptActiveModel {
            exam_id: Set(exam.id),
            student_id: Set(student_id),
            status: Set(AttemptStatus::InProgress.to_string()),
            started_at: Set(now.timestamp()),
            deadline_at: Set(exam.deadline_from(now).timestamp()),
            locked_at: Set(None),
            submitted_at: Set(None),
            score: Set(None),
            max_score: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let attempt = match inserted {
            Ok(attempt) => attempt,
            Err(e) => {
                let err = write_error("创建答题记录失败", e);
                drop(txn);
                // 并发开始时另一个请求已创建
                if matches!(err, CampusError::Conflict(_)) {
                    let existing = ExamAttempts::find()
                        .filter(AttemptColumn::ExamId.eq(exam.id))
                        .filter(AttemptColumn::StudentId.eq(student_id))
                        .one(&self.db)
                        .await
                        .map_err(|e| query_error("查询答题记录失败", e))?;
                    if let Some(existing) = existing {
                        return Ok(existing.into_attempt());
                    }
                }
                return Err(err);
            }
        };

        record_event(&txn, attempt.id, AttemptEventKind::Started, None, None).await?;

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        info!(
            "学生 {} 开始考试 {}，答题记录 {}",
            student_id, exam.id, attempt.id
        );

        Ok(attempt.into_attempt())
    }

    /// 获取答题记录，考试必须属于该学校
    pub async fn get_attempt_impl(&self, school_id: i64, id: i64) -> Result<Option<ExamAttempt>> {
        let result = ExamAttempts::find_by_id(id)
            .find_also_related(Exams)
            .one(&self.db)
            .await
            .map_err(|e| query_error("查询答题记录失败", e))?;

        Ok(result.and_then(|(attempt, exam)| {
            exam.filter(|e| e.school_id == school_id)
                .map(|_| attempt.into_attempt())
        }))
    }

    pub async fn list_attempt_answers_impl(&self, attempt_id: i64) -> Result<Vec<ExamAnswer>> {
        answers_of(&self.db, attempt_id).await
    }

    /// 保存答案，同一题目重复保存时覆盖
    ///
    /// 与锁定、交卷在同一行锁上串行，答题记录不在进行中时返回 `Closed`
    pub async fn save_answer_impl(
        &self,
        attempt_id: i64,
        question_id: i64,
        answer: &str,
    ) -> Result<AnswerOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        let attempt = lock_attempt(&txn, attempt_id)
            .await?
            .ok_or_else(|| CampusError::not_found("答题记录不存在"))?;
        if attempt.status != AttemptStatus::InProgress {
            return Ok(AnswerOutcome::Closed(attempt));
        }

        let model = AnswerActiveModel {
            attempt_id: Set(attempt_id),
            question_id: Set(question_id),
            answer: Set(answer.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        ExamAnswers::insert(model)
            .on_conflict(
                OnConflict::columns([AnswerColumn::AttemptId, AnswerColumn::QuestionId])
                    .update_columns([AnswerColumn::Answer, AnswerColumn::UpdatedAt])
                    .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(|e| write_error("保存答案失败", e))?;

        let saved = ExamAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .filter(AnswerColumn::QuestionId.eq(question_id))
            .one(&txn)
            .await
            .map_err(|e| query_error("查询答案失败", e))?
            .ok_or_else(|| CampusError::database_operation("保存答案后未找到记录"))?;

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        Ok(AnswerOutcome::Saved(saved.into_answer()))
    }

    pub async fn lock_exam_attempt_impl(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome> {
        self.run_transition(attempt_id, &LOCK, actor_user_id, reason)
            .await
    }

    pub async fn submit_exam_attempt_impl(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
    ) -> Result<TransitionOutcome> {
        self.run_transition(attempt_id, &SUBMIT, actor_user_id, None)
            .await
    }

    pub async fn unlock_exam_attempt_impl(
        &self,
        attempt_id: i64,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome> {
        self.run_transition(attempt_id, &UNLOCK, actor_user_id, reason)
            .await
    }

    async fn run_transition(
        &self,
        attempt_id: i64,
        plan: &TransitionPlan,
        actor_user_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<TransitionOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| query_error("开启事务失败", e))?;

        let current = lock_attempt(&txn, attempt_id)
            .await?
            .ok_or_else(|| CampusError::not_found("答题记录不存在"))?;
        let from = current.status;

        match (plan.guard)(from) {
            Transition::Apply => {}
            Transition::Noop => return Ok(TransitionOutcome::Unchanged(current)),
            Transition::Reject => return Ok(TransitionOutcome::Rejected(current)),
        }

        let now = chrono::Utc::now().timestamp();
        let mut update = ExamAttempts::update_many()
            .col_expr(AttemptColumn::Status, Expr::value(plan.to.to_string()))
            .filter(AttemptColumn::Id.eq(attempt_id))
            .filter(AttemptColumn::Status.eq(from.to_string()));

        update = match plan.to {
            AttemptStatus::Locked => update.col_expr(AttemptColumn::LockedAt, Expr::value(now)),
            AttemptStatus::InProgress => {
                update.col_expr(AttemptColumn::LockedAt, Expr::value(Option::<i64>::None))
            }
            AttemptStatus::Submitted => {
                let questions = questions_of(&txn, current.exam_id).await?;
                let answers = answers_of(&txn, attempt_id).await?;
                let (score, max_score) = score_choice_questions(&questions, &answers);
                update
                    .col_expr(AttemptColumn::SubmittedAt, Expr::value(now))
                    .col_expr(AttemptColumn::Score, Expr::value(score))
                    .col_expr(AttemptColumn::MaxScore, Expr::value(max_score))
            }
        };

        let result = update
            .exec(&txn)
            .await
            .map_err(|e| write_error("更新答题状态失败", e))?;

        if result.rows_affected == 0 {
            // 状态已被并发请求修改，按最新状态给出结果
            let latest = find_attempt(&txn, attempt_id)
                .await?
                .ok_or_else(|| CampusError::not_found("答题记录不存在"))?;
            return Ok(match (plan.guard)(latest.status) {
                Transition::Noop => TransitionOutcome::Unchanged(latest),
                _ => TransitionOutcome::Rejected(latest),
            });
        }

        record_event(&txn, attempt_id, plan.event, actor_user_id, reason).await?;

        let updated = find_attempt(&txn, attempt_id)
            .await?
            .ok_or_else(|| CampusError::not_found("答题记录不存在"))?;

        txn.commit()
            .await
            .map_err(|e| query_error("提交事务失败", e))?;

        info!(
            "答题记录 {} 状态变更: {} -> {}",
            attempt_id, from, updated.status
        );

        Ok(TransitionOutcome::Applied(updated))
    }

    /// 监考列表，按考试和状态筛选
    pub async fn list_attempts_impl(
        &self,
        school_id: i64,
        params: AttemptListParams,
    ) -> Result<Vec<ExamAttempt>> {
        let mut select = ExamAttempts::find()
            .inner_join(Exams)
            .filter(Column::SchoolId.eq(school_id));

        if let Some(exam_id) = params.exam_id {
            select = select.filter(AttemptColumn::ExamId.eq(exam_id));
        }
        if let Some(status) = params.status {
            select = select.filter(AttemptColumn::Status.eq(status.to_string()));
        }

        let attempts = select
            .order_by_desc(AttemptColumn::StartedAt)
            .order_by_desc(AttemptColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询答题记录失败", e))?;

        Ok(attempts.into_iter().map(|m| m.into_attempt()).collect())
    }

    pub async fn list_attempt_events_impl(&self, attempt_id: i64) -> Result<Vec<AttemptEvent>> {
        let events = ExamAttemptEvents::find()
            .filter(EventColumn::AttemptId.eq(attempt_id))
            .order_by_asc(EventColumn::CreatedAt)
            .order_by_asc(EventColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_error("查询答题事件失败", e))?;

        Ok(events.into_iter().map(|m| m.into_event()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::directory::requests::CreateStudentRequest;
    use crate::models::exams::{entities::QuestionKind, requests::CreateQuestionRequest};
    use chrono::{Duration, Utc};

    async fn setup() -> (SeaOrmStorage, i64, ExamDetailResponse, i64) {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = storage.ensure_school_impl("main", "Main").await.unwrap();
        let student = storage
            .create_student_impl(
                school.id,
                CreateStudentRequest {
                    first_name: "Ada".into(),
                    last_name: "Obi".into(),
                    grade_level: 6,
                    admission_no: "S-1".into(),
                },
            )
            .await
            .unwrap();
        let now = Utc::now();
        let exam = storage
            .create_exam_impl(
                school.id,
                CreateExamRequest {
                    title: "Maths midterm".into(),
                    grade_level: Some(6),
                    duration_minutes: 45,
                    opens_at: now - Duration::minutes(5),
                    closes_at: now + Duration::hours(2),
                    published: true,
                    questions: vec![
                        CreateQuestionRequest {
                            prompt: "2 + 2".into(),
                            kind: QuestionKind::Choice,
                            options: vec!["3".into(), "4".into()],
                            correct_answer: Some("4".into()),
                            points: 2,
                        },
                        CreateQuestionRequest {
                            prompt: "3 * 3".into(),
                            kind: QuestionKind::Choice,
                            options: vec!["6".into(), "9".into()],
                            correct_answer: Some("9".into()),
                            points: 3,
                        },
                        CreateQuestionRequest {
                            prompt: "Explain zero".into(),
                            kind: QuestionKind::Text,
                            options: vec![],
                            correct_answer: None,
                            points: 5,
                        },
                    ],
                },
            )
            .await
            .unwrap();
        (storage, school.id, exam, student.id)
    }

    #[actix_web::test]
    async fn test_start_resumes_single_attempt() {
        let (storage, school_id, detail, student_id) = setup().await;
        let first = storage
            .start_exam_attempt_impl(&detail.exam, student_id)
            .await
            .unwrap();
        let again = storage
            .start_exam_attempt_impl(&detail.exam, student_id)
            .await
            .unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(first.status, AttemptStatus::InProgress);
        assert!(first.deadline_at <= detail.exam.closes_at);

        let events = storage.list_attempt_events_impl(first.id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AttemptEventKind::Started);

        let other = storage.ensure_school_impl("other", "Other").await.unwrap();
        assert!(storage.get_attempt_impl(other.id, first.id).await.unwrap().is_none());
        assert!(storage.get_attempt_impl(school_id, first.id).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_lock_is_idempotent_with_one_event() {
        let (storage, _, detail, student_id) = setup().await;
        let attempt = storage
            .start_exam_attempt_impl(&detail.exam, student_id)
            .await
            .unwrap();

        let first = storage
            .lock_exam_attempt_impl(attempt.id, None, Some("tab switch".into()))
            .await
            .unwrap();
        assert!(matches!(first, TransitionOutcome::Applied(_)));
        assert!(first.attempt().locked_at.is_some());

        let second = storage
            .lock_exam_attempt_impl(attempt.id, None, Some("tab switch".into()))
            .await
            .unwrap();
        assert!(matches!(second, TransitionOutcome::Unchanged(_)));

        let locks = storage
            .list_attempt_events_impl(attempt.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == AttemptEventKind::Locked)
            .count();
        assert_eq!(locks, 1);

        // 锁定状态下提交被拒绝
        let submit = storage
            .submit_exam_attempt_impl(attempt.id, None)
            .await
            .unwrap();
        assert!(matches!(submit, TransitionOutcome::Rejected(_)));

        let unlocked = storage
            .unlock_exam_attempt_impl(attempt.id, None, Some("proctor ok".into()))
            .await
            .unwrap();
        assert!(matches!(unlocked, TransitionOutcome::Applied(_)));
        assert_eq!(unlocked.attempt().status, AttemptStatus::InProgress);
        assert!(unlocked.attempt().locked_at.is_none());

        let events = storage.list_attempt_events_impl(attempt.id).await.unwrap();
        let unlock_event = events
            .iter()
            .find(|e| e.kind == AttemptEventKind::Unlocked)
            .unwrap();
        assert_eq!(unlock_event.reason.as_deref(), Some("proctor ok"));
    }

    #[actix_web::test]
    async fn test_submit_scores_choice_questions() {
        let (storage, _, detail, student_id) = setup().await;
        let attempt = storage
            .start_exam_attempt_impl(&detail.exam, student_id)
            .await
            .unwrap();
        let q = &detail.questions;

        storage.save_answer_impl(attempt.id, q[0].id, "3").await.unwrap();
        // 覆盖之前的答案
        storage.save_answer_impl(attempt.id, q[0].id, "4").await.unwrap();
        storage.save_answer_impl(attempt.id, q[1].id, "6").await.unwrap();
        storage
            .save_answer_impl(attempt.id, q[2].id, "Nothing at all")
            .await
            .unwrap();
        assert_eq!(storage.list_attempt_answers_impl(attempt.id).await.unwrap().len(), 3);

        let submitted = storage
            .submit_exam_attempt_impl(attempt.id, None)
            .await
            .unwrap();
        assert!(matches!(submitted, TransitionOutcome::Applied(_)));
        assert_eq!(submitted.attempt().score, Some(2));
        assert_eq!(submitted.attempt().max_score, Some(5));

        let again = storage
            .submit_exam_attempt_impl(attempt.id, None)
            .await
            .unwrap();
        assert!(matches!(again, TransitionOutcome::Unchanged(_)));
        assert_eq!(again.attempt().score, Some(2));

        let lock = storage.lock_exam_attempt_impl(attempt.id, None, None).await.unwrap();
        assert!(matches!(lock, TransitionOutcome::Rejected(_)));
    }

    #[actix_web::test]
    async fn test_answer_not_written_after_lock_or_submit() {
        let (storage, _, detail, student_id) = setup().await;
        let attempt = storage
            .start_exam_attempt_impl(&detail.exam, student_id)
            .await
            .unwrap();
        let q = &detail.questions;

        storage.lock_exam_attempt_impl(attempt.id, None, None).await.unwrap();
        let outcome = storage.save_answer_impl(attempt.id, q[0].id, "4").await.unwrap();
        assert!(
            matches!(outcome, AnswerOutcome::Closed(ref a) if a.status == AttemptStatus::Locked)
        );
        assert!(storage.list_attempt_answers_impl(attempt.id).await.unwrap().is_empty());

        storage.unlock_exam_attempt_impl(attempt.id, None, None).await.unwrap();
        storage.save_answer_impl(attempt.id, q[0].id, "3").await.unwrap();
        let submitted = storage
            .submit_exam_attempt_impl(attempt.id, None)
            .await
            .unwrap();
        assert_eq!(submitted.attempt().score, Some(0));

        // 交卷后不能再改答案，分数保持不变
        let outcome = storage.save_answer_impl(attempt.id, q[0].id, "4").await.unwrap();
        assert!(
            matches!(outcome, AnswerOutcome::Closed(ref a) if a.status == AttemptStatus::Submitted)
        );
        let answers = storage.list_attempt_answers_impl(attempt.id).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer, "3");

        let missing = storage.save_answer_impl(attempt.id + 99, q[0].id, "4").await;
        assert!(matches!(missing, Err(CampusError::NotFound(_))));
    }
}
