// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::crm::{Customer, CustomerDebtDetail, DebtAdjustment},
};

// Ajuste de dívida é assinado: positivo cria dívida, negativo abate.
// Zero não registra nada e é recusado.
fn validate_non_zero(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_zero() {
        let mut err = ValidationError::new("non_zero");
        err.message = Some("O ajuste não pode ser zero.".into());
        return Err(err);
    }
    Ok(())
}

// =============================================================================
//  CLIENTES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[schema(example = "11 98888-7777")]
    pub phone: Option<String>,

    #[schema(example = "Rua das Flores, 123")]
    pub address: Option<String>,

    pub notes: Option<String>,
}

// POST /api/crm/customers
#[utoipa::path(
    post,
    path = "/api/crm/customers",
    tag = "CRM",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .crm_service
        .create_customer(
            &payload.name,
            payload.phone.as_deref(),
            payload.address.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(customer)))
}

#[derive(Debug, Deserialize)]
pub struct CustomerSearchQuery {
    pub q: Option<String>,
}

// GET /api/crm/customers?q=
#[utoipa::path(
    get,
    path = "/api/crm/customers",
    tag = "CRM",
    params(
        ("q" = Option<String>, Query, description = "Busca por nome ou telefone")
    ),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<CustomerSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = app_state
        .crm_service
        .list_customers(query.q.as_deref())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/crm/customers/{id}
#[utoipa::path(
    get,
    path = "/api/crm/customers/{id}",
    tag = "CRM",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Cliente encontrado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state
        .crm_service
        .get_customer(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

// PUT /api/crm/customers/{id}
#[utoipa::path(
    put,
    path = "/api/crm/customers/{id}",
    tag = "CRM",
    request_body = UpdateCustomerPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state
        .crm_service
        .update_customer(
            id,
            payload.name.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/crm/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/crm/customers/{id}",
    tag = "CRM",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente possui pedidos")
    )
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete_customer(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  FIADO (DÍVIDAS E AJUSTES)
// =============================================================================

// GET /api/crm/debts
#[utoipa::path(
    get,
    path = "/api/crm/debts",
    tag = "CRM",
    responses(
        (status = 200, description = "Situação de fiado de todos os clientes", body = Vec<CustomerDebtDetail>)
    )
)]
pub async fn list_debts(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let debts = app_state
        .crm_service
        .list_debts()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(debts)))
}

// GET /api/crm/customers/{id}/debt
#[utoipa::path(
    get,
    path = "/api/crm/customers/{id}/debt",
    tag = "CRM",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Situação de fiado do cliente", body = CustomerDebtDetail),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_customer_debt(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let debt = app_state
        .crm_service
        .get_customer_debt(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(debt)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtAdjustmentPayload {
    // Positivo aumenta a dívida (fiado antigo, taxa); negativo abate
    // (perdão, acerto fora do sistema).
    #[validate(custom(function = "validate_non_zero"))]
    #[schema(example = "-50.00")]
    pub amount: Decimal,

    #[schema(example = "Acerto em dinheiro fora do sistema")]
    pub reason: Option<String>,

    pub notes: Option<String>,
}

// POST /api/crm/customers/{id}/debt-adjustments
#[utoipa::path(
    post,
    path = "/api/crm/customers/{id}/debt-adjustments",
    tag = "CRM",
    request_body = CreateDebtAdjustmentPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 201, description = "Ajuste registrado", body = DebtAdjustment),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn create_debt_adjustment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateDebtAdjustmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let adjustment = app_state
        .crm_service
        .create_debt_adjustment(
            id,
            payload.amount,
            payload.reason.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(adjustment)))
}

// GET /api/crm/customers/{id}/debt-adjustments
#[utoipa::path(
    get,
    path = "/api/crm/customers/{id}/debt-adjustments",
    tag = "CRM",
    params(
        ("id" = Uuid, Path, description = "ID do Cliente")
    ),
    responses(
        (status = 200, description = "Ajustes do cliente", body = Vec<DebtAdjustment>),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn list_debt_adjustments(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let adjustments = app_state
        .crm_service
        .list_debt_adjustments(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(adjustments)))
}
