use crate::config::Config;
use crate::database::FormStore;
use crate::error::ApiError;
use crate::logging::{self, UuidRequestId};
use crate::response::{self, ApiResponse, BogieChecksheetSaved, WheelSpecificationItem};
use crate::seed;
use crate::state::AppState;
use crate::validation::{self, ValidationError, WheelSpecificationParams};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/forms/bogie-checksheet", post(create_bogie_checksheet))
        .route(
            "/api/forms/wheel-specifications",
            get(list_wheel_specifications),
        )
        .route("/populate-dummy-wheel-data", post(populate_demo_wheel_data))
        .layer(TraceLayer::new_for_http().make_span_with(logging::request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Opens the store described by `config`, then serves until Ctrl-C.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = if config.in_memory() {
        FormStore::open_in_memory()?
    } else {
        FormStore::open(&config.database_path)?
    };

    if config.seed_demo_data {
        seed::seed_demo_wheel_specifications(&store)?;
    }

    let app_state = AppState::new(store).with_default_limit(config.default_page_limit);
    let app = build_router(app_state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, db = %config.database_path.display(), "KPA form server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("KPA form server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn create_bogie_checksheet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<BogieChecksheetSaved>>), ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(ValidationError::invalid_json)?;
    let form = validation::validate_bogie_checksheet(&payload)?;

    let record = state.store.create_bogie_checksheet(&form)?;
    info!(form_number = %record.form_number, "bogie checksheet saved");

    Ok((StatusCode::CREATED, Json(response::checksheet_saved(&record))))
}

async fn list_wheel_specifications(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<WheelSpecificationItem>>>, ApiError> {
    let Query(pairs) =
        query.map_err(|rejection| ValidationError::invalid_query(rejection.body_text()))?;
    let params = WheelSpecificationParams::from_pairs(pairs);
    let (filter, page) = validation::validate_wheel_query(&params, state.default_limit)?;
    let records = state.store.list_wheel_specifications(&filter, page)?;
    Ok(Json(response::wheel_specification_list(records)?))
}

async fn populate_demo_wheel_data(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    seed::seed_demo_wheel_specifications(&state.store)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Dummy wheel specification data populated successfully." })),
    ))
}
