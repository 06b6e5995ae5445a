use axum::routing::{get, patch, post};
use axum::Router;

use crate::backend::{handlers, AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(handlers::sign_up))
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/sign-out", post(handlers::sign_out))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(handlers::get_profile).patch(handlers::update_profile))
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::add_transaction),
        )
        .route(
            "/api/transactions/:id",
            patch(handlers::update_transaction).delete(handlers::delete_transaction),
        )
        .route(
            "/api/investments",
            get(handlers::list_investments).post(handlers::add_investment),
        )
        .route(
            "/api/investments/:id",
            patch(handlers::update_investment).delete(handlers::delete_investment),
        )
        .route("/api/savings-goals", get(handlers::list_goals).post(handlers::add_goal))
        .route(
            "/api/savings-goals/:id",
            patch(handlers::update_goal).delete(handlers::delete_goal),
        )
        .route(
            "/api/budget-categories",
            get(handlers::list_budget_categories).post(handlers::add_budget_category),
        )
        .route(
            "/api/budget-categories/:id",
            patch(handlers::update_budget_category).delete(handlers::delete_budget_category),
        )
        .route("/api/bad-habits", get(handlers::list_habits).post(handlers::add_habit))
        .route("/api/bad-habits/savings", get(handlers::total_habit_savings))
        .route(
            "/api/bad-habits/:id",
            patch(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route(
            "/api/bad-habits/:id/tracking",
            get(handlers::list_habit_tracking).post(handlers::track_habit),
        )
        .route("/api/bad-habits/:id/streak", get(handlers::habit_streak))
        .route("/api/bad-habits/:id/statistics", get(handlers::habit_statistics))
        .route("/api/bad-habits/:id/savings", get(handlers::habit_savings))
        .route("/api/summary", get(handlers::get_summary).put(handlers::update_summary))
        .route("/api/summary/refresh", post(handlers::refresh_summary))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/changes", get(handlers::changes))
}
