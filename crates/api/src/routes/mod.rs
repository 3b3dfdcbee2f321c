pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /coins/balance                       balance + study/streak counters (GET)
/// /coins/transactions                  own ledger, filterable (GET)
/// /coins/checkout                      create payment checkout session (POST)
///
/// /practice                            submit practice seconds (POST)
/// /checkin                             daily check-in (POST)
///
/// /gifts                               active catalog (GET)
/// /redemptions                         redeem gift (POST), own history (GET)
///
/// /llm/chat                            tutoring chat proxy (POST)
/// /llm/dictionary                      dictionary lookup proxy (POST)
/// /llm/pronunciation                   pronunciation feedback proxy (POST)
///
/// /webhooks/payments                   payment provider events (POST, signed)
///
/// /admin/users                         list users (GET, admin only)
/// /admin/users/export                  CSV export (GET)
/// /admin/transactions                  full ledger, filterable (GET)
/// /admin/transactions/export           CSV export (GET)
/// /admin/redemptions                   all redemptions, filterable (GET)
/// /admin/redemptions/export            CSV export (GET)
/// /admin/redemptions/{id}/status       workflow transition (PUT)
/// /admin/gifts                         list incl. inactive (GET), create (POST)
/// /admin/gifts/{id}                    update (PUT), deactivate (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Coin economy.
        .route("/coins/balance", get(handlers::coins::get_balance))
        .route(
            "/coins/transactions",
            get(handlers::coins::list_transactions),
        )
        .route("/coins/checkout", post(handlers::coins::create_checkout))
        // Earning.
        .route("/practice", post(handlers::practice::submit_practice))
        .route("/checkin", post(handlers::practice::check_in))
        // Gift catalog and redemption.
        .route("/gifts", get(handlers::gifts::list_gifts))
        .route(
            "/redemptions",
            post(handlers::gifts::create_redemption).get(handlers::gifts::list_redemptions),
        )
        // LLM proxies.
        .route("/llm/chat", post(handlers::llm::chat))
        .route("/llm/dictionary", post(handlers::llm::dictionary))
        .route("/llm/pronunciation", post(handlers::llm::pronunciation))
        // Payment provider webhook (signature-authenticated, no JWT).
        .route("/webhooks/payments", post(handlers::webhook::payment_webhook))
        // Admin surface.
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/users/export", get(handlers::admin::export_users))
        .route(
            "/admin/transactions",
            get(handlers::admin::list_transactions),
        )
        .route(
            "/admin/transactions/export",
            get(handlers::admin::export_transactions),
        )
        .route("/admin/redemptions", get(handlers::admin::list_redemptions))
        .route(
            "/admin/redemptions/export",
            get(handlers::admin::export_redemptions),
        )
        .route(
            "/admin/redemptions/{id}/status",
            put(handlers::admin::update_redemption_status),
        )
        .route(
            "/admin/gifts",
            get(handlers::admin::list_gifts).post(handlers::admin::create_gift),
        )
        .route(
            "/admin/gifts/{id}",
            put(handlers::admin::update_gift).delete(handlers::admin::deactivate_gift),
        )
}
