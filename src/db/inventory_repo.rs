// src/db/inventory_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{ImportHistoryEntry, Material, MaterialImport},
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (usam a pool principal)
    // ---

    pub async fn get_all_materials(&self, search: Option<&str>) -> Result<Vec<Material>, AppError> {
        let materials = sqlx::query_as::<_, Material>(
            r#"
            SELECT * FROM materials
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(materials)
    }

    pub async fn get_material_by_id(&self, id: Uuid) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(material)
    }

    // Comparação exata e sensível a maiúsculas, regra da importação em
    // lote. Roda no executor da transação do lote para enxergar os
    // materiais criados pelas linhas anteriores.
    pub async fn find_material_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<Material>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let material = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await?;

        Ok(material)
    }

    pub async fn get_imports_for_material(
        &self,
        material_id: Uuid,
    ) -> Result<Vec<MaterialImport>, AppError> {
        let imports = sqlx::query_as::<_, MaterialImport>(
            r#"
            SELECT * FROM material_imports
            WHERE material_id = $1
            ORDER BY import_date DESC
            "#,
        )
        .bind(material_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(imports)
    }

    // Pares (material, quantidade, preço) de todo o razão, para o
    // cálculo de custo médio em lote sem uma query por material.
    pub async fn get_all_import_lots(&self) -> Result<Vec<(Uuid, Decimal, Decimal)>, AppError> {
        let lots = sqlx::query_as::<_, (Uuid, Decimal, Decimal)>(
            "SELECT material_id, quantity, unit_price FROM material_imports",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lots)
    }

    pub async fn get_import_history(
        &self,
        material_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<ImportHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, ImportHistoryEntry>(
            r#"
            SELECT
                mi.id,
                mi.material_id,
                m.name AS material_name,
                mi.quantity,
                mi.unit_price,
                mi.notes,
                mi.import_date
            FROM material_imports mi
            JOIN materials m ON m.id = mi.material_id
            WHERE ($1::uuid IS NULL OR mi.material_id = $1)
              AND ($2::timestamptz IS NULL OR mi.import_date >= $2)
              AND ($3::timestamptz IS NULL OR mi.import_date <= $3)
            ORDER BY mi.import_date DESC
            "#,
        )
        .bind(material_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // ---
    // Escritas (padrão 'Executor' para rodar dentro de transações)
    // ---

    pub async fn create_material<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit: &str,
        initial_stock: Option<Decimal>,
    ) -> Result<Material, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (name, unit, current_stock)
            VALUES ($1, $2, COALESCE($3, 0))
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(initial_stock)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em erro amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::MaterialNameTaken(name.to_string());
                }
            }
            e.into()
        })
    }

    // current_stock entra aqui só como correção manual de inventário;
    // o fluxo normal passa por increment_stock / try_decrement_stock.
    pub async fn update_material<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        unit: Option<&str>,
        current_stock: Option<Decimal>,
    ) -> Result<Option<Material>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials SET
                name          = COALESCE($2, name),
                unit          = COALESCE($3, unit),
                current_stock = COALESCE($4, current_stock),
                updated_at    = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .bind(current_stock)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::MaterialNameTaken(name.unwrap_or_default().to_string());
                }
            }
            e.into()
        })
    }

    pub async fn delete_material<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // Guardas de remoção: material com importações ou usado em receita
    // não sai do cadastro.
    pub async fn count_imports_for_material<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM material_imports WHERE material_id = $1",
        )
        .bind(material_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn count_bom_refs_for_material<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_materials WHERE material_id = $1",
        )
        .bind(material_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn create_import<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
        notes: Option<&str>,
        import_date: Option<DateTime<Utc>>,
    ) -> Result<MaterialImport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let import = sqlx::query_as::<_, MaterialImport>(
            r#"
            INSERT INTO material_imports (material_id, quantity, unit_price, notes, import_date)
            VALUES ($1, $2, $3, $4, COALESCE($5, now()))
            RETURNING *
            "#,
        )
        .bind(material_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(notes)
        .bind(import_date)
        .fetch_one(executor)
        .await?;

        Ok(import)
    }

    // Entrada de estoque: soma no saldo, na mesma transação do registro
    // da importação.
    pub async fn increment_stock<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
        quantity: Decimal,
    ) -> Result<Option<Material>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let material = sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials SET
                current_stock = current_stock + $2,
                updated_at    = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(material_id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;

        Ok(material)
    }

    // Nome e saldo atuais, lidos dentro da transação que falhou em
    // debitar, para o erro sair com os números daquele instante.
    pub async fn get_material_snapshot<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
    ) -> Result<Option<(String, Decimal)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, (String, Decimal)>(
            "SELECT name, current_stock FROM materials WHERE id = $1",
        )
        .bind(material_id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    // Baixa condicional e atômica: só debita se o saldo cobre o pedido.
    // Zero linhas afetadas significa estoque insuficiente NAQUELE
    // instante, mesmo que o cheque prévio tenha passado.
    pub async fn try_decrement_stock<'e, E>(
        &self,
        executor: E,
        material_id: Uuid,
        quantity: Decimal,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE materials SET
                current_stock = current_stock - $2,
                updated_at    = now()
            WHERE id = $1 AND current_stock >= $2
            "#,
        )
        .bind(material_id)
        .bind(quantity)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
