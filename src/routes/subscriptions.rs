use super::Envelope;
use crate::{
    app_state::AppState,
    domain::{MonthYear, NewSubscription, Subscription, SubscriptionUpdate, TotalPriceFilter},
    service::SubscriptionError,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

pub fn router(base_path: &str) -> Router<AppState> {
    let prefix = format!("{}/subscriptions", base_path.trim_end_matches('/'));

    Router::new()
        .route(&format!("{prefix}/create"), post(create_subscription))
        .route(&format!("{prefix}/total-price"), get(total_price))
        .route(&prefix, get(list_subscriptions))
        .route(&format!("{prefix}/"), get(list_subscriptions))
        .route(
            &format!("{prefix}/:id"),
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}

#[tracing::instrument(name = "Adding a new subscription", skip(app_state, body))]
async fn create_subscription(
    State(app_state): State<AppState>,
    body: Result<Json<NewSubscription>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Subscription>>), ApiError> {
    let Json(new_subscription) = body?;
    let subscription = app_state.subscriptions.create(new_subscription).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(subscription).with_message("subscription created")),
    ))
}

#[tracing::instrument(name = "Getting a subscription", skip(app_state))]
async fn get_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Subscription>>, ApiError> {
    let id = parse_subscription_id(&id)?;
    let subscription = app_state.subscriptions.get_by_id(id).await?;

    Ok(Json(Envelope::data(subscription)))
}

#[tracing::instrument(name = "Listing subscriptions of a user", skip(app_state, parameters))]
async fn list_subscriptions(
    State(app_state): State<AppState>,
    parameters: Result<Query<UserParameters>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Subscription>>>, ApiError> {
    let Query(parameters) = parameters?;
    let user_id = parse_user_id(parameters.user_id.as_deref())?;
    let subscriptions = app_state.subscriptions.list_by_user(user_id).await?;

    Ok(Json(Envelope::data(subscriptions)))
}

#[tracing::instrument(name = "Calculating total price", skip(app_state, parameters))]
async fn total_price(
    State(app_state): State<AppState>,
    parameters: Result<Query<TotalPriceParameters>, QueryRejection>,
) -> Result<Json<Envelope<i64>>, ApiError> {
    let Query(parameters) = parameters?;
    let filter = TotalPriceFilter::for_user(parse_user_id(parameters.user_id.as_deref())?)
        .service_name(parameters.service_name)
        .starting_from(parse_month(parameters.from.as_deref(), "from")?)
        .up_to(parse_month(parameters.to.as_deref(), "to")?);

    let total = app_state.subscriptions.total_price(filter).await?;

    Ok(Json(
        Envelope::data(total).with_message("total price calculated"),
    ))
}

#[tracing::instrument(name = "Updating a subscription", skip(app_state, body))]
async fn update_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SubscriptionUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Subscription>>, ApiError> {
    let id = parse_subscription_id(&id)?;
    let Json(patch) = body?;
    let subscription = app_state.subscriptions.update(id, patch).await?;

    Ok(Json(
        Envelope::data(subscription).with_message("subscription updated"),
    ))
}

#[tracing::instrument(name = "Deleting a subscription", skip(app_state))]
async fn delete_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = parse_subscription_id(&id)?;
    app_state.subscriptions.delete(id).await?;

    Ok(Json(Envelope::message("subscription deleted")))
}

#[derive(Deserialize)]
struct UserParameters {
    #[serde(rename = "user-id")]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct TotalPriceParameters {
    #[serde(rename = "user-id")]
    user_id: Option<String>,
    #[serde(rename = "service-name")]
    service_name: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

fn parse_subscription_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id)
        .map_err(|_| ApiError::InvalidRequest("invalid subscription ID format".into()))
}

fn parse_user_id(user_id: Option<&str>) -> Result<Uuid, ApiError> {
    match user_id {
        None | Some("") => Err(ApiError::InvalidRequest(
            "user-id query parameter is required".into(),
        )),
        Some(user_id) => Uuid::parse_str(user_id)
            .map_err(|_| ApiError::InvalidRequest("invalid user-id format".into())),
    }
}

fn parse_month(month: Option<&str>, name: &str) -> Result<Option<MonthYear>, ApiError> {
    match month {
        None | Some("") => Ok(None),
        Some(month) => MonthYear::parse_wire(month)
            .map(Some)
            .map_err(|_| ApiError::InvalidRequest(format!("invalid {name} date format"))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    SubscriptionError(#[from] SubscriptionError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        let status = match &self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::SubscriptionError(SubscriptionError::ValidationError(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::SubscriptionError(SubscriptionError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::SubscriptionError(SubscriptionError::UnexpectedError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}
