use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, patch, post},
    Router,
};
use shiftdesk_agent::LlmProvider;
use shiftdesk_core::config::ShiftdeskConfig;
use shiftdesk_scheduler::{Advisor, AiClient, AiSettings, BalanceMode, ProposalGenerator};
use shiftdesk_store::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::http;

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ShiftdeskConfig,
    pub db: Database,
    pub proposals: ProposalGenerator,
    pub advisor: Advisor,
}

impl AppState {
    pub fn new(
        config: ShiftdeskConfig,
        db: Database,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let client = AiClient::new(provider, AiSettings::from(&config.ai));
        Self {
            proposals: ProposalGenerator::new(client.clone()),
            advisor: Advisor::new(client),
            config,
            db,
        }
    }

    /// `?strict=` on the request wins over `balance.strict_overlap`.
    pub fn balance_mode(&self, strict: Option<bool>) -> BalanceMode {
        if strict.unwrap_or(self.config.balance.strict_overlap) {
            BalanceMode::Strict
        } else {
            BalanceMode::Lenient
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // browser front-ends are served from another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(http::health::health_handler))
        .route(
            "/employees",
            post(http::employees::create_employee).get(http::employees::list_employees),
        )
        .route(
            "/employees/departments",
            post(http::employees::create_department).get(http::employees::list_departments),
        )
        .route(
            "/employees/{id}",
            get(http::employees::get_employee)
                .patch(http::employees::update_employee)
                .delete(http::employees::delete_employee),
        )
        .route(
            "/shifts",
            post(http::shifts::create_shift).get(http::shifts::list_shifts),
        )
        .route(
            "/shifts/{id}",
            get(http::shifts::get_shift).delete(http::shifts::delete_shift),
        )
        .route(
            "/assignments",
            post(http::assignments::create_assignment).get(http::assignments::list_assignments),
        )
        .route(
            "/assignments/auto-balance",
            post(http::assignments::auto_balance),
        )
        .route(
            "/assignments/{id}",
            patch(http::assignments::update_assignment).delete(http::assignments::delete_assignment),
        )
        .route("/ai/generate-schedule", post(http::ai::generate_schedule))
        .route("/ai/optimize-schedule", post(http::ai::optimize_schedule))
        .route("/ai/suggest-assignment", post(http::ai::suggest_assignment))
        .route("/ai/insights", post(http::ai::insights))
        .route("/ai/chat", post(http::ai::chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
