//! Notices, questions and reports.

use chrono::{DateTime, Utc};
use common::QuestionStatus;
use serde::{Deserialize, Serialize};

use super::shared::{UserSummary, double_option, validate_text};
use crate::entity::{notice, notice_type, question, report};
use crate::error::AppError;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateNoticeRequest {
    pub notice_type_id: Option<i32>,
    pub title: String,
    pub content: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateNoticeRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub notice_type_id: Option<Option<i32>>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateNoticeTypeRequest {
    #[schema(example = "Maintenance")]
    pub label: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RecentNoticeQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NoticeTypeResponse {
    pub id: i32,
    pub label: String,
    pub created_date: DateTime<Utc>,
}

impl From<notice_type::Model> for NoticeTypeResponse {
    fn from(m: notice_type::Model) -> Self {
        Self {
            id: m.id,
            label: m.label,
            created_date: m.created_date,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NoticeResponse {
    pub id: i32,
    pub notice_type_id: Option<i32>,
    pub notice_type_label: Option<String>,
    pub title: String,
    pub content: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl NoticeResponse {
    pub fn new(m: notice::Model, notice_type_label: Option<String>) -> Self {
        Self {
            id: m.id,
            notice_type_id: m.notice_type_id,
            notice_type_label,
            title: m.title,
            content: m.content,
            created_date: m.created_date,
            updated_date: m.updated_date,
        }
    }
}

pub fn validate_create_notice(req: &CreateNoticeRequest) -> Result<(), AppError> {
    validate_text(&req.title, 256, "NOTICE.INVALID_TITLE")?;
    validate_text(&req.content, 10_000, "NOTICE.INVALID_CONTENT")
}

pub fn validate_update_notice(req: &UpdateNoticeRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_text(title, 256, "NOTICE.INVALID_TITLE")?;
    }
    if let Some(ref content) = req.content {
        validate_text(content, 10_000, "NOTICE.INVALID_CONTENT")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateQuestionRequest {
    pub question: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateQuestionRequest {
    pub question: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AnswerQuestionRequest {
    pub answer: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddAnswerCommentRequest {
    pub comment: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct QuestionListQuery {
    /// 1 = answered, 2 = pending.
    pub status: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestionResponse {
    pub id: i32,
    pub question: String,
    pub user: UserSummary,
    pub question_date: DateTime<Utc>,
    pub answer: Option<String>,
    pub answer_date: Option<DateTime<Utc>>,
    #[schema(value_type = i32)]
    pub status: QuestionStatus,
}

impl QuestionResponse {
    pub fn new(m: question::Model, user: UserSummary) -> Self {
        Self {
            id: m.id,
            question: m.question,
            user,
            question_date: m.question_date,
            answer: m.answer,
            answer_date: m.answer_date,
            status: m.status,
        }
    }
}

pub fn validate_question_text(question: &str) -> Result<(), AppError> {
    validate_text(question, 1000, "QUESTION.INVALID_CONTENT")
}

pub fn validate_answer(req: &AnswerQuestionRequest) -> Result<(), AppError> {
    validate_text(&req.answer, 2000, "QUESTION.INVALID_ANSWER")
}

pub fn parse_question_status(status: Option<i32>) -> Result<Option<QuestionStatus>, AppError> {
    status
        .map(QuestionStatus::try_from)
        .transpose()
        .map_err(|_| AppError::Rejected("QUESTION.INVALID_STATUS"))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateReportRequest {
    /// The reported user.
    pub user_id: i32,
    #[serde(default)]
    pub report_type: i32,
    pub content: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateReportRequest {
    pub report_type: Option<i32>,
    pub content: Option<String>,
    pub status: Option<i32>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ReportListQuery {
    pub status: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReportResponse {
    pub id: i32,
    pub user: UserSummary,
    pub reporter: UserSummary,
    pub report_type: i32,
    pub content: String,
    pub status: i32,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl ReportResponse {
    pub fn new(m: report::Model, user: UserSummary, reporter: UserSummary) -> Self {
        Self {
            id: m.id,
            user,
            reporter,
            report_type: m.report_type,
            content: m.content,
            status: m.status,
            created_date: m.created_date,
            updated_date: m.updated_date,
        }
    }
}

pub fn validate_create_report(req: &CreateReportRequest) -> Result<(), AppError> {
    validate_text(&req.content, 3000, "REPORT.INVALID_CONTENT")
}

pub fn validate_update_report(req: &UpdateReportRequest) -> Result<(), AppError> {
    if let Some(ref content) = req.content {
        validate_text(content, 3000, "REPORT.INVALID_CONTENT")?;
    }
    Ok(())
}
