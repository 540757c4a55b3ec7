// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{BomMaterialRow, Product, ProductMaterial},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (usam a pool principal)
    // ---

    pub async fn get_all_products(&self, search: Option<&str>) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn get_product_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    // Receita do produto com nome, unidade e estoque atual de cada
    // material, na ordem de cadastro.
    pub async fn get_bom_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<BomMaterialRow>, AppError> {
        let rows = sqlx::query_as::<_, BomMaterialRow>(
            r#"
            SELECT
                pm.material_id,
                m.name AS material_name,
                m.unit,
                pm.quantity_required,
                m.current_stock
            FROM product_materials pm
            JOIN materials m ON m.id = pm.material_id
            WHERE pm.product_id = $1
            ORDER BY m.name ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Todas as linhas de receita de uma vez, para montar a listagem de
    // produtos sem uma query por produto.
    pub async fn get_all_bom_lines(&self) -> Result<Vec<(Uuid, Uuid, Decimal)>, AppError> {
        let lines = sqlx::query_as::<_, (Uuid, Uuid, Decimal)>(
            "SELECT product_id, material_id, quantity_required FROM product_materials",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn get_material_stocks(&self) -> Result<Vec<(Uuid, Decimal)>, AppError> {
        let stocks =
            sqlx::query_as::<_, (Uuid, Decimal)>("SELECT id, current_stock FROM materials")
                .fetch_all(&self.pool)
                .await?;

        Ok(stocks)
    }

    // ---
    // Escritas (padrão 'Executor' para rodar dentro de transações)
    // ---

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit: &str,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, unit)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit)
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        unit: Option<&str>,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name       = COALESCE($2, name),
                unit       = COALESCE($3, unit),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_bom_line<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        material_id: Uuid,
        quantity_required: Decimal,
    ) -> Result<ProductMaterial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductMaterial>(
            r#"
            INSERT INTO product_materials (product_id, material_id, quantity_required)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(material_id)
        .bind(quantity_required)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                // Material sumiu entre a checagem e o INSERT
                if db_err.is_foreign_key_violation() {
                    return AppError::MaterialNotFound;
                }
                if db_err.is_unique_violation() {
                    return AppError::DuplicateBomMaterial(material_id.to_string());
                }
            }
            e.into()
        })
    }

    // A troca de receita apaga as linhas antigas e insere as novas na
    // mesma transação.
    pub async fn delete_bom_for_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_materials WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
