// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Produto (catálogo) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    #[schema(example = "Bolsa térmica G")]
    pub name: String,

    #[schema(example = "un")]
    pub unit: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Receita (linha da lista de materiais) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductMaterial {
    pub id: Uuid,
    pub product_id: Uuid,
    pub material_id: Uuid,

    // Quanto do material entra em UMA unidade do produto.
    #[schema(example = "0.750")]
    pub quantity_required: Decimal,
}

// Linha da receita como sai do JOIN com materials, ainda sem custo.
#[derive(Debug, Clone, FromRow)]
pub struct BomMaterialRow {
    pub material_id: Uuid,
    pub material_name: String,
    pub unit: String,
    pub quantity_required: Decimal,
    pub current_stock: Decimal,
}

// Linha da receita com os dados do material resolvidos.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BomLineDetail {
    pub material_id: Uuid,
    pub material_name: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub quantity_required: Decimal,
    pub average_cost: Decimal,

    // quantity_required × average_cost do material.
    pub line_cost: Decimal,
}

// --- 3. Visões calculadas ---

// Produto na listagem: custo unitário + quantas unidades o estoque
// atual permite produzir (floor sobre o material mais restritivo).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductOverview {
    pub id: Uuid,
    pub name: String,
    pub unit: String,

    #[schema(example = "34.80")]
    pub unit_cost: Decimal,

    #[schema(example = 12)]
    pub possible_quantity: i64,

    pub materials_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,

    pub unit_cost: Decimal,
    pub possible_quantity: i64,
    pub materials: Vec<BomLineDetail>,
}

// Prévia de custo para uma receita ainda não salva.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostPreview {
    pub unit_cost: Decimal,
    pub possible_quantity: i64,
    pub materials: Vec<BomLineDetail>,
}
