use axum::{
    Json,
    extract::{Path, State},
};
use common::QuestionStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{answer_comment, question};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::content::{
    AddAnswerCommentRequest, AnswerQuestionRequest, CreateQuestionRequest, QuestionListQuery,
    QuestionResponse, UpdateQuestionRequest, parse_question_status, validate_answer,
    validate_question_text,
};
use crate::models::shared::{
    ActionResponse, CountResponse, ItemResponse, ListResponse, validate_limit, validate_text,
};
use crate::state::AppState;
use crate::utils::lookup;

async fn find_question<C: ConnectionTrait>(db: &C, id: i32) -> Result<question::Model, AppError> {
    question::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("QUESTION_NOT_FOUND"))
}

async fn with_authors<C: ConnectionTrait>(
    db: &C,
    questions: Vec<question::Model>,
) -> Result<Vec<QuestionResponse>, AppError> {
    let users = lookup::user_summaries(db, questions.iter().map(|q| q.user_id)).await?;
    Ok(questions
        .into_iter()
        .map(|q| {
            let author = lookup::summary_of(&users, q.user_id);
            QuestionResponse::new(q, author)
        })
        .collect())
}

#[utoipa::path(
    post,
    path = "/questions",
    tag = "Questions",
    operation_id = "createQuestion",
    summary = "Ask a question",
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Question registered as pending", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Empty question (REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_question_text(&payload.question)?;

    let model = question::ActiveModel {
        question: Set(payload.question.trim().to_string()),
        user_id: Set(auth_user.user_id),
        question_date: Set(chrono::Utc::now()),
        answer: Set(None),
        answer_date: Set(None),
        status: Set(QuestionStatus::Pending),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created(
        "QUESTION_REGISTER_SUCCESS",
        model.id,
    )))
}

#[utoipa::path(
    get,
    path = "/questions",
    tag = "Questions",
    operation_id = "listQuestions",
    summary = "List questions, newest first",
    params(QuestionListQuery),
    responses(
        (status = 200, description = "Questions", body = ListResponse<QuestionResponse>),
        (status = 404, description = "Invalid status or zero limit (REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_questions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<QuestionListQuery>,
) -> Result<Json<ListResponse<QuestionResponse>>, AppError> {
    validate_limit(query.limit)?;
    let status = parse_question_status(query.status)?;

    let mut select = question::Entity::find();
    if let Some(status) = status {
        select = select.filter(question::Column::Status.eq(status));
    }
    let select = select
        .order_by_desc(question::Column::QuestionDate)
        .order_by_desc(question::Column::Id);

    let total = select.clone().count(&state.db).await?;
    let rows = select
        .limit(query.limit)
        .offset(query.offset)
        .all(&state.db)
        .await?;

    Ok(Json(ListResponse::counted(
        with_authors(&state.db, rows).await?,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/questions/{id}",
    tag = "Questions",
    operation_id = "getQuestion",
    summary = "Get a question",
    params(("id" = i32, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question", body = ItemResponse<QuestionResponse>),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse<QuestionResponse>>, AppError> {
    let model = find_question(&state.db, id).await?;
    let result = with_authors(&state.db, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("QUESTION_NOT_FOUND"))?;
    Ok(Json(ItemResponse { result }))
}

#[utoipa::path(
    patch,
    path = "/questions/{id}",
    tag = "Questions",
    operation_id = "updateQuestion",
    summary = "Edit a question",
    description = "Allowed for the author and holders of `content:manage`.",
    params(("id" = i32, Path, description = "Question ID")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or empty question (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateQuestionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_question_text(&payload.question)?;
    let existing = find_question(&state.db, id).await?;
    auth_user.require_owner_or(existing.user_id, "content:manage")?;

    let mut active: question::ActiveModel = existing.into();
    active.question = Set(payload.question.trim().to_string());
    active.update(&state.db).await?;

    Ok(Json(ActionResponse::done("QUESTION_UPDATE_SUCCESS")))
}

#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "Questions",
    operation_id = "deleteQuestion",
    summary = "Delete a question",
    description = "Allowed for the author and holders of `content:manage`. Answer comments go with it.",
    params(("id" = i32, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Number of deleted questions", body = CountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountResponse>, AppError> {
    let existing = find_question(&state.db, id).await?;
    auth_user.require_owner_or(existing.user_id, "content:manage")?;

    let result = question::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;
    Ok(Json(CountResponse {
        result: result.rows_affected,
    }))
}

#[utoipa::path(
    post,
    path = "/questions/{id}/answer",
    tag = "Questions",
    operation_id = "answerQuestion",
    summary = "Answer a question",
    description = "Sets the answer and marks the question answered. Requires `content:manage`.",
    params(("id" = i32, Path, description = "Question ID")),
    request_body = AnswerQuestionRequest,
    responses(
        (status = 200, description = "Answer stored", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found or empty answer (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn answer_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AnswerQuestionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    validate_answer(&payload)?;
    let existing = find_question(&state.db, id).await?;

    let mut active: question::ActiveModel = existing.into();
    active.answer = Set(Some(payload.answer.trim().to_string()));
    active.answer_date = Set(Some(chrono::Utc::now()));
    active.status = Set(QuestionStatus::Answered);
    active.update(&state.db).await?;

    Ok(Json(ActionResponse::done("QUESTION_ANSWER_ADD_SUCCESS")))
}

#[utoipa::path(
    post,
    path = "/questions/{id}/comments",
    tag = "Questions",
    operation_id = "addAnswerComment",
    summary = "Comment on an answer",
    params(("id" = i32, Path, description = "Question ID")),
    request_body = AddAnswerCommentRequest,
    responses(
        (status = 200, description = "Comment added", body = ActionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not found or empty comment (NOT_FOUND, REJECTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn add_answer_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AddAnswerCommentRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    validate_text(&payload.comment, 2000, "ANSWER_COMMENT.INVALID_CONTENT")?;
    find_question(&state.db, id).await?;

    let model = answer_comment::ActiveModel {
        question_id: Set(id),
        user_id: Set(auth_user.user_id),
        comment: Set(payload.comment.trim().to_string()),
        created_date: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(ActionResponse::created(
        "ANSWER_COMMENT_REGISTER_SUCCESS",
        model.id,
    )))
}
