use std::convert::Infallible;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use futures_util::stream;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth::Session;
use crate::backend::extract::{JsonBody, PathParam, QueryParams};
use crate::backend::{AppState, AuthUser};
use crate::database::models::{
    BadHabit, BadHabitPatch, BudgetCategory, BudgetCategoryPatch, FinancialSummary, HabitStatistic, HabitTracking,
    Investment, InvestmentPatch, NewBadHabit, NewBudgetCategory, NewInvestment, NewSavingsGoal, NewTransaction,
    ProfilePatch, SavingsGoal, SavingsGoalPatch, SummaryPatch, Transaction, TransactionPatch, User,
};
use crate::error::{AppError, AppResult};
use crate::finance::dashboard::Dashboard;
use crate::finance::Month;
use crate::realtime::Table;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/* ========== Auth ========== */

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

pub async fn sign_up(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignUpRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state
        .auth
        .sign_up(&req.email, &req.password, req.full_name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn sign_in(State(state): State<AppState>, JsonBody(req): JsonBody<SignInRequest>) -> AppResult<Json<Session>> {
    Ok(Json(state.auth.sign_in(&req.email, &req.password).await?))
}

pub async fn sign_out(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.auth.sign_out(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== Profile ========== */

pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(state.store.profile(auth.user.id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(patch): JsonBody<ProfilePatch>,
) -> AppResult<Json<User>> {
    Ok(Json(state.store.update_profile(auth.user.id, patch).await?))
}

/* ========== Transactions ========== */

pub async fn list_transactions(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<Transaction>>> {
    Ok(Json(state.store.list_transactions(auth.user.id).await?))
}

pub async fn add_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(new): JsonBody<NewTransaction>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let row = state.store.add_transaction(auth.user.id, new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<TransactionPatch>,
) -> AppResult<Json<Transaction>> {
    Ok(Json(state.store.update_transaction(auth.user.id, id, patch).await?))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.store.delete_transaction(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== Investments ========== */

pub async fn list_investments(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<Investment>>> {
    Ok(Json(state.store.list_investments(auth.user.id).await?))
}

pub async fn add_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(new): JsonBody<NewInvestment>,
) -> AppResult<(StatusCode, Json<Investment>)> {
    let row = state.store.add_investment(auth.user.id, new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<InvestmentPatch>,
) -> AppResult<Json<Investment>> {
    Ok(Json(state.store.update_investment(auth.user.id, id, patch).await?))
}

pub async fn delete_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.store.delete_investment(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== Savings goals ========== */

pub async fn list_goals(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<SavingsGoal>>> {
    Ok(Json(state.store.list_goals(auth.user.id).await?))
}

pub async fn add_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(new): JsonBody<NewSavingsGoal>,
) -> AppResult<(StatusCode, Json<SavingsGoal>)> {
    let row = state.store.add_goal(auth.user.id, new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<SavingsGoalPatch>,
) -> AppResult<Json<SavingsGoal>> {
    Ok(Json(state.store.update_goal(auth.user.id, id, patch).await?))
}

pub async fn delete_goal(State(state): State<AppState>, auth: AuthUser, PathParam(id): PathParam<Uuid>) -> AppResult<StatusCode> {
    state.store.delete_goal(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== Budget categories ========== */

pub async fn list_budget_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<BudgetCategory>>> {
    Ok(Json(state.store.list_budget_categories(auth.user.id).await?))
}

pub async fn add_budget_category(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(new): JsonBody<NewBudgetCategory>,
) -> AppResult<(StatusCode, Json<BudgetCategory>)> {
    let row = state.store.add_budget_category(auth.user.id, new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_budget_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<BudgetCategoryPatch>,
) -> AppResult<Json<BudgetCategory>> {
    Ok(Json(state.store.update_budget_category(auth.user.id, id, patch).await?))
}

pub async fn delete_budget_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.store.delete_budget_category(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== Bad habits ========== */

/// Inclusive date range. Either end defaults to the current month's bound.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RangeQuery {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let month = Month::current();
        (
            self.start.unwrap_or_else(|| month.first_day()),
            self.end.unwrap_or_else(|| month.last_day()),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub avoided: bool,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub habit_id: Uuid,
    pub streak: u32,
}

#[derive(Debug, Serialize)]
pub struct SavingsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit_id: Option<Uuid>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub savings: Decimal,
}

pub async fn list_habits(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<BadHabit>>> {
    Ok(Json(state.store.list_habits(auth.user.id).await?))
}

pub async fn add_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(new): JsonBody<NewBadHabit>,
) -> AppResult<(StatusCode, Json<BadHabit>)> {
    let row = state.store.add_habit(auth.user.id, new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<BadHabitPatch>,
) -> AppResult<Json<BadHabit>> {
    Ok(Json(state.store.update_habit(auth.user.id, id, patch).await?))
}

pub async fn delete_habit(State(state): State<AppState>, auth: AuthUser, PathParam(id): PathParam<Uuid>) -> AppResult<StatusCode> {
    state.store.delete_habit(auth.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_habit_tracking(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Vec<HabitTracking>>> {
    Ok(Json(state.store.habit_tracking(auth.user.id, id).await?))
}

pub async fn track_habit(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(req): JsonBody<TrackRequest>,
) -> AppResult<Json<HabitTracking>> {
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.store.track_habit(auth.user.id, id, date, req.avoided).await?))
}

pub async fn habit_streak(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<StreakResponse>> {
    let streak = state
        .store
        .habit_streak(auth.user.id, id, Utc::now().date_naive())
        .await?;
    Ok(Json(StreakResponse { habit_id: id, streak }))
}

pub async fn habit_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    QueryParams(range): QueryParams<RangeQuery>,
) -> AppResult<Json<Vec<HabitStatistic>>> {
    let (start, end) = range.resolve();
    Ok(Json(state.store.habit_statistics(auth.user.id, id, start, end).await?))
}

pub async fn habit_savings(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    QueryParams(range): QueryParams<RangeQuery>,
) -> AppResult<Json<SavingsResponse>> {
    let (start, end) = range.resolve();
    let savings = state.store.habit_savings(auth.user.id, id, start, end).await?;
    Ok(Json(SavingsResponse {
        habit_id: Some(id),
        start,
        end,
        savings,
    }))
}

pub async fn total_habit_savings(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(range): QueryParams<RangeQuery>,
) -> AppResult<Json<SavingsResponse>> {
    let (start, end) = range.resolve();
    let savings = state.store.total_habit_savings(auth.user.id, start, end).await?;
    Ok(Json(SavingsResponse {
        habit_id: None,
        start,
        end,
        savings,
    }))
}

/* ========== Summary & dashboard ========== */

pub async fn get_summary(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<FinancialSummary>> {
    Ok(Json(state.store.summary(auth.user.id).await?))
}

pub async fn update_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(patch): JsonBody<SummaryPatch>,
) -> AppResult<Json<FinancialSummary>> {
    Ok(Json(state.store.update_summary(auth.user.id, patch).await?))
}

pub async fn refresh_summary(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<FinancialSummary>> {
    Ok(Json(state.store.refresh_summary(auth.user.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub month: Option<Month>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<DashboardQuery>,
) -> AppResult<Json<Dashboard>> {
    let month = query.month.unwrap_or_else(Month::current);
    let today = Utc::now().date_naive();
    Ok(Json(state.store.dashboard(auth.user.id, month, today).await?))
}

/* ========== Change stream ========== */

#[derive(Debug, Deserialize)]
pub struct ChangesQuery {
    #[serde(default)]
    pub table: Option<String>,
}

/// Streams the caller's change events. Each SSE event is named after its
/// table and carries the JSON event as data.
pub async fn changes(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ChangesQuery>,
) -> AppResult<impl IntoResponse> {
    let table = query
        .table
        .as_deref()
        .map(str::parse::<Table>)
        .transpose()
        .map_err(AppError::Validation)?;

    let subscription = state.store.subscribe(auth.user.id, table);
    tracing::debug!(user = %auth.user.id, ?table, "change stream opened");

    let events = stream::unfold(subscription, |mut sub| async move {
        let change = sub.next().await?;
        let event = Event::default()
            .event(change.table.as_str())
            .json_data(&change)
            .unwrap_or_else(|_| Event::default().event(change.table.as_str()));
        Some((Ok::<_, Infallible>(event), sub))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
