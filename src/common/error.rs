// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erro de negócio, com `thiserror` para melhor ergonomia.
// As mensagens aqui são as de log; a resposta HTTP sai traduzida
// pelo `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- CRM ---
    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Cliente possui pedidos registrados")]
    CustomerHasOrders,

    // --- Estoque ---
    #[error("Material não encontrado")]
    MaterialNotFound,

    #[error("Já existe um material chamado '{0}'")]
    MaterialNameTaken(String),

    #[error("Material referenciado por receitas ou importações")]
    MaterialInUse,

    // Carrega os números do cheque de estoque para a resposta dizer
    // exatamente o que faltou.
    #[error("Estoque insuficiente de '{material}': necessário {required}, disponível {available}")]
    InsufficientStock {
        material: String,
        required: Decimal,
        available: Decimal,
    },

    // --- Catálogo ---
    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Material repetido na receita: '{0}'")]
    DuplicateBomMaterial(String),

    // --- Vendas ---
    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Pedido sem itens")]
    EmptyOrder,

    #[error("Item de pedido inválido: {0}")]
    InvalidOrderItem(String),

    #[error("Valor de pagamento deve ser positivo")]
    InvalidPaymentAmount,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// Erro pronto para virar resposta HTTP: status + corpo já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl AppError {
    // Traduz o erro de negócio para o idioma do cliente e escolhe o
    // status HTTP. Os handlers chamam isto em todo `map_err`.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        let (status, body) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = json!({
                    "error": store.get(lang, "validation.invalid_fields"),
                    "details": details,
                });
                (StatusCode::BAD_REQUEST, body)
            }

            AppError::CustomerNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": store.get(lang, "crm.customer_not_found") }),
            ),
            AppError::CustomerHasOrders => (
                StatusCode::CONFLICT,
                json!({ "error": store.get(lang, "crm.customer_has_orders") }),
            ),

            AppError::MaterialNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": store.get(lang, "inventory.material_not_found") }),
            ),
            AppError::MaterialNameTaken(name) => (
                StatusCode::CONFLICT,
                json!({
                    "error": store.render(lang, "inventory.material_name_taken", &[("name", name.clone())]),
                }),
            ),
            AppError::MaterialInUse => (
                StatusCode::CONFLICT,
                json!({ "error": store.get(lang, "inventory.material_in_use") }),
            ),
            AppError::InsufficientStock {
                material,
                required,
                available,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": store.render(
                        lang,
                        "inventory.insufficient_stock",
                        &[
                            ("material", material.clone()),
                            ("required", required.to_string()),
                            ("available", available.to_string()),
                        ],
                    ),
                    "material": material,
                    "required": required,
                    "available": available,
                }),
            ),

            AppError::ProductNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": store.get(lang, "catalog.product_not_found") }),
            ),
            AppError::DuplicateBomMaterial(name) => (
                StatusCode::CONFLICT,
                json!({
                    "error": store.render(lang, "catalog.duplicate_bom_material", &[("name", name.clone())]),
                }),
            ),

            AppError::OrderNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": store.get(lang, "sales.order_not_found") }),
            ),
            AppError::EmptyOrder => (
                StatusCode::BAD_REQUEST,
                json!({ "error": store.get(lang, "sales.empty_order") }),
            ),
            AppError::InvalidOrderItem(detail) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": store.render(lang, "sales.invalid_order_item", &[("detail", detail.clone())]),
                }),
            ),
            AppError::InvalidPaymentAmount => (
                StatusCode::BAD_REQUEST,
                json!({ "error": store.get(lang, "sales.invalid_payment_amount") }),
            ),

            // Erros de infraestrutura viram 500 com mensagem genérica.
            // O `tracing` fica com a mensagem detalhada do `thiserror`.
            AppError::DatabaseError(e) => {
                tracing::error!("Erro de banco de dados: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": store.get(lang, "common.internal_error") }),
                )
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro interno do servidor: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": store.get(lang, "common.internal_error") }),
                )
            }
        };

        ApiError { status, body }
    }
}
