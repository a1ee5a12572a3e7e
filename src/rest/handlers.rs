use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    ledger::{LedgerError, NewCustomer, NewPayment},
    storage::{Category, CustomerFilter, CustomerId, Storage},
};

use super::{
    models::{
        AddCustomerRequest, AddPaymentRequest, CustomerQuery, ErrorResponse, HealthResponse,
        PeriodQuery,
    },
    AppState,
};

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn add_customer<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<AddCustomerRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let category = match Category::from_str(&req.category) {
        Ok(category) => category,
        Err(err) => return bad_request(err.to_string()),
    };

    match state.ledger.add_customer(NewCustomer {
        id: req.id,
        name: req.name,
        village: req.village,
        category,
        phone: req.phone,
    }) {
        Ok(customer) => Json(customer).into_response(),
        Err(err) => ledger_error_response("add customer", err),
    }
}

pub async fn get_customer<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_customer_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.ledger.find_customer(id) {
        Ok(customer) => Json(customer).into_response(),
        Err(err) => ledger_error_response("find customer", err),
    }
}

pub async fn list_customers<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let category = match non_blank(query.category) {
        Some(raw) => match Category::from_str(&raw) {
            Ok(category) => Some(category),
            Err(err) => return bad_request(err.to_string()),
        },
        None => None,
    };
    let filter = CustomerFilter {
        name: non_blank(query.name),
        village: non_blank(query.village),
        category,
    };
    match state.ledger.list_customers(&filter) {
        Ok(customers) => Json(customers).into_response(),
        Err(err) => ledger_error_response("list customers", err),
    }
}

pub async fn delete_customer<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_customer_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.ledger.delete_customer(id) {
        Ok(deleted) => Json(deleted).into_response(),
        Err(err) => ledger_error_response("delete customer", err),
    }
}

pub async fn customer_total<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_customer_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.ledger.total_paid(id) {
        Ok(total) => Json(total).into_response(),
        Err(err) => ledger_error_response("total paid", err),
    }
}

pub async fn customer_payments<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_customer_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.ledger.payments_for_customer(id) {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => ledger_error_response("payments for customer", err),
    }
}

pub async fn add_payment<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<AddPaymentRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.ledger.add_payment(NewPayment {
        customer_id: req.customer_id,
        period: req.period,
        amount: req.amount,
    }) {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => ledger_error_response("add payment", err),
    }
}

pub async fn period_payments<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let Some(period) = non_blank(query.period) else {
        return bad_request("query parameter `period` is required".to_string());
    };
    match state.ledger.payments_for_period(&period) {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => ledger_error_response("payments for period", err),
    }
}

pub async fn list_villages<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> Response {
    match state.ledger.list_villages() {
        Ok(villages) => Json(villages).into_response(),
        Err(err) => ledger_error_response("list villages", err),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, Response> {
    CustomerId::from_str(raw).map_err(|err| {
        log::warn!("Invalid customer id {}: {}", raw, err);
        bad_request("invalid customer id".to_string())
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
}

fn ledger_error_response(operation: &str, err: LedgerError) -> Response {
    let status = match &err {
        LedgerError::Validation(_) | LedgerError::Conflict(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        log::error!("Failed to {}: {:?}", operation, err);
    } else {
        log::warn!("Rejected {}: {}", operation, err);
    }
    (
        status,
        Json(ErrorResponse {
            message: err.to_string(),
        }),
    )
        .into_response()
}
