//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
};
use serde::Serialize;

use show_core::draft::stripe_configuration;
use show_core::{
    Episode, Product, StripeConfiguration, StripeSessionStatus, UserProfile, Video,
    wire::{
        AddVideoRequest, CheckoutRequest, ErrorResponse, LoginResponse, RoleResponse,
        StripeConfiguredResponse, bearer_token, codes,
    },
};

use crate::state::AppState;
use crate::store::{Caller, StoreError};
use crate::payments::{CheckoutParams, GatewayError};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn store_error(err: StoreError) -> ApiError {
    let (status, code) = match &err {
        StoreError::AlreadyAuthenticated => (StatusCode::CONFLICT, codes::ALREADY_AUTHENTICATED),
        StoreError::Unauthorized => (StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED),
        StoreError::Forbidden => (StatusCode::FORBIDDEN, codes::FORBIDDEN),
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, codes::NOT_FOUND),
        StoreError::Conflict(_) => (StatusCode::CONFLICT, codes::CONFLICT),
        StoreError::Invalid(_) => (StatusCode::BAD_REQUEST, codes::INVALID_INPUT),
    };
    api_error(status, code, err.to_string())
}

fn gateway_error(err: GatewayError) -> ApiError {
    let (status, code) = match &err {
        GatewayError::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, codes::STRIPE_NOT_CONFIGURED),
        GatewayError::Invalid(_) => (StatusCode::BAD_REQUEST, codes::INVALID_INPUT),
        GatewayError::Stripe(_) => (StatusCode::BAD_GATEWAY, codes::STRIPE_ERROR),
    };
    if status == StatusCode::BAD_GATEWAY {
        tracing::error!(error = %err, "Stripe request failed");
    }
    api_error(status, code, err.to_string())
}

// ============================================================================
// Callers
// ============================================================================

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

fn current_caller(state: &AppState, headers: &HeaderMap) -> Option<Caller> {
    session_token(headers).and_then(|token| state.store.caller(token))
}

fn require_caller(state: &AppState, headers: &HeaderMap) -> Result<Caller, ApiError> {
    current_caller(state, headers).ok_or_else(|| store_error(StoreError::Unauthorized))
}

// ============================================================================
// Health & Auth
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.payments.is_configured(),
    })
}

pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<LoginResponse>, ApiError> {
    let (token, caller) = state.store.login(session_token(&headers)).map_err(store_error)?;
    Ok(Json(LoginResponse { token, role: caller.role }))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = session_token(&headers) {
        state.store.logout(token);
    }
    StatusCode::NO_CONTENT
}

pub async fn get_role(State(state): State<AppState>, headers: HeaderMap) -> Json<RoleResponse> {
    let caller = current_caller(&state, &headers);
    Json(RoleResponse { role: state.store.role_of(caller.as_ref()) })
}

pub async fn get_profile(State(state): State<AppState>, headers: HeaderMap) -> Json<Option<UserProfile>> {
    let caller = current_caller(&state, &headers);
    Json(state.store.profile(caller.as_ref()))
}

pub async fn save_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(profile): Json<UserProfile>,
) -> Result<StatusCode, ApiError> {
    let caller = current_caller(&state, &headers);
    state.store.save_profile(caller.as_ref(), profile).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Catalog
// ============================================================================

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.store.products())
}

pub async fn add_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(product): Json<Product>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    tracing::info!(product_id = %product.id, "Adding product");
    state.store.add_product(&caller, product).map_err(store_error)?;
    Ok(StatusCode::CREATED)
}

pub async fn update_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(product): Json<Product>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    check_path_id(&id, &product.id)?;
    state.store.update_product(&caller, product).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    state.store.delete_product(&caller, &id).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_episodes(State(state): State<AppState>) -> Json<Vec<Episode>> {
    Json(state.store.episodes())
}

pub async fn add_episode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(episode): Json<Episode>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    tracing::info!(episode_id = %episode.id, "Adding episode");
    state.store.add_episode(&caller, episode).map_err(store_error)?;
    Ok(StatusCode::CREATED)
}

pub async fn update_episode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(episode): Json<Episode>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    check_path_id(&id, &episode.id)?;
    state.store.update_episode(&caller, episode).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_episode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    state.store.delete_episode(&caller, &id).map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_videos(State(state): State<AppState>) -> Json<Vec<Video>> {
    Json(state.store.videos())
}

pub async fn add_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddVideoRequest>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    state
        .store
        .add_video(&caller, request.id, request.blob)
        .map_err(store_error)?;
    Ok(StatusCode::CREATED)
}

fn check_path_id(path_id: &str, body_id: &str) -> Result<(), ApiError> {
    if path_id == body_id {
        Ok(())
    } else {
        Err(api_error(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            format!("Path id {path_id} does not match body id {body_id}"),
        ))
    }
}

// ============================================================================
// Payments
// ============================================================================

pub async fn stripe_config_status(State(state): State<AppState>) -> Json<StripeConfiguredResponse> {
    Json(StripeConfiguredResponse { configured: state.payments.is_configured() })
}

pub async fn set_stripe_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(config): Json<StripeConfiguration>,
) -> Result<StatusCode, ApiError> {
    let caller = require_caller(&state, &headers)?;
    caller.require_admin().map_err(store_error)?;
    let config = stripe_configuration(&config.secret_key, &config.allowed_countries.join(","))
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, codes::INVALID_INPUT, e.user_message()))?;
    state.payments.configure(&config);
    Ok(StatusCode::NO_CONTENT)
}

/// Create a hosted checkout session
///
/// The body is the serialized `{id, url}` descriptor; the browser validates it
/// before redirecting.
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<([(header::HeaderName, &'static str); 1], String), ApiError> {
    if request.items.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, codes::INVALID_INPUT, "Cart is empty"));
    }
    let gateway = state.payments.gateway().map_err(gateway_error)?;
    let caller = current_caller(&state, &headers);

    let session = gateway
        .create_session(CheckoutParams {
            items: &request.items,
            success_url: &request.success_url,
            cancel_url: &request.cancel_url,
            client_reference: caller.as_ref().map(|c| c.principal.as_str()),
        })
        .await
        .map_err(gateway_error)?;

    let body = serde_json::to_string(&session)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, codes::STRIPE_ERROR, e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

pub async fn checkout_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<StripeSessionStatus>, ApiError> {
    let gateway = state.payments.gateway().map_err(gateway_error)?;
    let status = gateway.session_status(&session_id).await.map_err(gateway_error)?;
    tracing::info!(session_id = %session_id, completed = status.is_completed(), "Checkout status");
    Ok(Json(status))
}
