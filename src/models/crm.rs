// src/models/crm.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Cliente ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Dona Marta Confeitaria")]
    pub name: String,

    #[schema(example = "+55 11 98888-7777")]
    pub phone: Option<String>,

    pub address: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Ajuste manual de dívida ---
// Valor com sinal: positivo aumenta a dívida do cliente, negativo abate.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtAdjustment {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[schema(example = "-250.00")]
    pub amount: Decimal,

    #[schema(example = "Acerto de fiado antigo")]
    pub reason: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

// --- Visão de dívida por cliente ---
// Agregados calculados na leitura (soma de pedidos + ajustes), nunca
// armazenados. outstanding_debt = Σ debt_amount dos pedidos + Σ ajustes.

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDebtDetail {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,

    #[schema(example = "12500.00")]
    pub total_revenue: Decimal,
    #[schema(example = "4100.00")]
    pub total_profit: Decimal,
    #[schema(example = "9800.00")]
    pub paid_total: Decimal,
    #[schema(example = "-250.00")]
    pub adjustments_total: Decimal,
    #[schema(example = "2450.00")]
    pub outstanding_debt: Decimal,

    #[schema(example = 14)]
    pub orders_count: i64,
    pub last_order_date: Option<DateTime<Utc>>,
}
