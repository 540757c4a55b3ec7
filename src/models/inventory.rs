// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Matéria-prima ---
// current_stock é mantido pela aplicação: importações somam, pedidos
// deduzem. Nenhum trigger de banco mexe nesta coluna.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,

    #[schema(example = "Tecido tricoline")]
    pub name: String,

    #[schema(example = "m")]
    pub unit: String,

    #[schema(example = "42.500")]
    pub current_stock: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Importação (entrada de estoque) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialImport {
    pub id: Uuid,
    pub material_id: Uuid,

    #[schema(example = "10.000")]
    pub quantity: Decimal,

    #[schema(example = "18.90")]
    pub unit_price: Decimal,

    pub notes: Option<String>,
    pub import_date: DateTime<Utc>,
}

// Linha do histórico de importações, com o nome do material resolvido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportHistoryEntry {
    pub id: Uuid,
    pub material_id: Uuid,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub notes: Option<String>,
    pub import_date: DateTime<Utc>,
}

// --- 3. Custo médio ponderado ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCost {
    pub material_id: Uuid,
    pub material_name: String,

    // Σ(qtd × preço) / Σ(qtd) sobre todas as importações; zero sem histórico.
    #[schema(example = "17.35")]
    pub average_cost: Decimal,

    #[schema(example = "42.500")]
    pub current_stock: Decimal,

    #[schema(example = 6)]
    pub imports_count: i64,
}

// Material + custo médio, para a listagem do estoque.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialWithCost {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub average_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 4. Importação em lote (planilha colada) ---

// Linha rejeitada no lote, com o motivo para o usuário corrigir.
// name fica vazio quando a linha nem chegou a ter um nome legível.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBulkRow {
    #[schema(example = 3)]
    pub line: usize,

    #[schema(example = "Tecido tricoline")]
    pub name: Option<String>,

    #[schema(example = "quantidade deve ser maior que zero")]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportReport {
    #[schema(example = 2)]
    pub materials_created: usize,

    #[schema(example = 12)]
    pub rows_imported: usize,

    pub skipped: Vec<SkippedBulkRow>,
}
