// src/services/crm_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CrmRepository,
    models::crm::{Customer, CustomerDebtDetail, DebtAdjustment},
};

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
    pool: PgPool,
}

impl CrmService {
    pub fn new(repo: CrmRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_customer(
        &self,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Customer, AppError> {
        self.repo
            .create_customer(&self.pool, name, phone, address, notes)
            .await
    }

    pub async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>, AppError> {
        self.repo.get_all_customers(search).await
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .get_customer_by_id(id)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Customer, AppError> {
        self.repo
            .update_customer(&self.pool, id, name, phone, address, notes)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    // Remoção só para cliente sem pedido. A contagem roda na mesma
    // transação do DELETE para não disputar com um pedido chegando.
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let orders = self.repo.count_orders_for_customer(&mut *tx, id).await?;
        if orders > 0 {
            return Err(AppError::CustomerHasOrders);
        }

        let deleted = self.repo.delete_customer(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::CustomerNotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  DÍVIDAS
    // =========================================================================

    pub async fn list_debts(&self) -> Result<Vec<CustomerDebtDetail>, AppError> {
        self.repo.get_debt_details().await
    }

    pub async fn get_customer_debt(&self, customer_id: Uuid) -> Result<CustomerDebtDetail, AppError> {
        self.repo
            .get_debt_detail_for_customer(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn create_debt_adjustment(
        &self,
        customer_id: Uuid,
        amount: Decimal,
        reason: Option<&str>,
        notes: Option<&str>,
    ) -> Result<DebtAdjustment, AppError> {
        // Confere o cliente antes: FK estourada viraria um 500 opaco
        self.repo
            .get_customer_by_id(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        self.repo
            .create_debt_adjustment(&self.pool, customer_id, amount, reason, notes)
            .await
    }

    pub async fn list_debt_adjustments(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<DebtAdjustment>, AppError> {
        self.repo
            .get_customer_by_id(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        self.repo.get_adjustments_for_customer(customer_id).await
    }
}
