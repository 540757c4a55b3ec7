// src/services/sales_service.rs
//
// Submissão de pedidos em duas fases. O PLANEJAMENTO é puro: valida os
// itens, resolve custos, expande receitas e confere estoque sobre um
// snapshot congelado — nenhuma escrita acontece enquanto houver chance
// de recusa. A EXECUÇÃO grava o plano inteiro numa transação única,
// com baixa de estoque condicional: se o saldo mudou desde o snapshot,
// a transação inteira volta e nada fica pela metade.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CrmRepository, InventoryRepository, SalesRepository},
    models::sales::{
        DraftOrderItem, Order, OrderDetail, OrderItemType, OrderListEntry, OrderStatus, Payment,
        PaymentMethod,
    },
    services::pricing::{self, DraftItemAmounts},
};

// --- Tipos do planejamento ---

// Snapshot de tudo que o plano consulta: nomes e saldos dos materiais
// envolvidos, custo médio de cada um e a receita de cada produto.
#[derive(Debug, Clone, Default)]
pub struct PlanContext {
    pub material_names: HashMap<Uuid, String>,
    pub material_stock: HashMap<Uuid, Decimal>,
    pub material_costs: HashMap<Uuid, Decimal>,
    pub product_boms: HashMap<Uuid, Vec<(Uuid, Decimal)>>,
}

// Linha pronta para persistir: custo unitário já resolvido pelo
// servidor (o cliente nunca dita custo).
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub item_type: OrderItemType,
    pub product_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit_cost: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone)]
pub struct OrderPlan {
    pub customer_id: Uuid,
    pub items: Vec<PlannedItem>,
    // Baixa total por material, em ordem fixa de id: pedidos
    // concorrentes travam as linhas na mesma sequência.
    pub requirements: Vec<(Uuid, Decimal)>,
    pub total_amount: Decimal,
    pub total_cost: Decimal,
    pub paid_amount: Decimal,
    pub debt_amount: Decimal,
    pub profit: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
}

// --- Funções puras do planejamento ---

// Quanto de cada material o pedido consome, somado entre os itens:
// item de material pede a própria quantidade; item de produto expande
// a receita (quantidade da linha × quantidade pedida).
pub fn material_requirements(
    items: &[DraftOrderItem],
    product_boms: &HashMap<Uuid, Vec<(Uuid, Decimal)>>,
) -> Result<Vec<(Uuid, Decimal)>, AppError> {
    let mut required: HashMap<Uuid, Decimal> = HashMap::new();

    for item in items {
        match item.item_type {
            OrderItemType::Material => {
                let material_id = item
                    .material_id
                    .ok_or_else(|| AppError::InvalidOrderItem("item de material sem materialId".into()))?;
                *required.entry(material_id).or_insert(Decimal::ZERO) += item.quantity;
            }
            OrderItemType::Product => {
                let product_id = item
                    .product_id
                    .ok_or_else(|| AppError::InvalidOrderItem("item de produto sem productId".into()))?;
                let bom = product_boms
                    .get(&product_id)
                    .ok_or(AppError::ProductNotFound)?;

                for (material_id, quantity_required) in bom {
                    *required.entry(*material_id).or_insert(Decimal::ZERO) +=
                        quantity_required * item.quantity;
                }
            }
        }
    }

    let mut requirements: Vec<(Uuid, Decimal)> = required.into_iter().collect();
    requirements.sort_by_key(|(material_id, _)| *material_id);
    Ok(requirements)
}

// Confere cada exigência contra o saldo do snapshot. A primeira que
// não couber derruba a submissão inteira, com nome e números no erro.
pub fn check_feasibility(
    requirements: &[(Uuid, Decimal)],
    material_names: &HashMap<Uuid, String>,
    material_stock: &HashMap<Uuid, Decimal>,
) -> Result<(), AppError> {
    for (material_id, required) in requirements {
        let available = material_stock
            .get(material_id)
            .copied()
            .ok_or(AppError::MaterialNotFound)?;

        if *required > available {
            let material = material_names
                .get(material_id)
                .cloned()
                .unwrap_or_else(|| material_id.to_string());
            return Err(AppError::InsufficientStock {
                material,
                required: *required,
                available,
            });
        }
    }
    Ok(())
}

// Monta o plano completo do pedido sem encostar no banco. Qualquer
// recusa sai daqui antes de existir qualquer escrita.
#[allow(clippy::too_many_arguments)]
pub fn plan_order(
    customer_id: Uuid,
    items: &[DraftOrderItem],
    paid_amount_raw: Option<&str>,
    payment_method: PaymentMethod,
    notes: Option<&str>,
    order_date: Option<DateTime<Utc>>,
    ctx: &PlanContext,
) -> Result<OrderPlan, AppError> {
    if items.is_empty() {
        return Err(AppError::EmptyOrder);
    }

    // 1. Valida cada linha e resolve o custo unitário
    let mut planned = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= Decimal::ZERO {
            return Err(AppError::InvalidOrderItem("quantidade deve ser positiva".into()));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(AppError::InvalidOrderItem("preço não pode ser negativo".into()));
        }
        if item.discount < Decimal::ZERO {
            return Err(AppError::InvalidOrderItem("desconto não pode ser negativo".into()));
        }

        let (product_id, material_id, unit_cost) = match item.item_type {
            OrderItemType::Material => {
                let material_id = item
                    .material_id
                    .ok_or_else(|| AppError::InvalidOrderItem("item de material sem materialId".into()))?;
                if !ctx.material_names.contains_key(&material_id) {
                    return Err(AppError::MaterialNotFound);
                }
                let unit_cost = ctx
                    .material_costs
                    .get(&material_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                (None, Some(material_id), unit_cost)
            }
            OrderItemType::Product => {
                let product_id = item
                    .product_id
                    .ok_or_else(|| AppError::InvalidOrderItem("item de produto sem productId".into()))?;
                let bom = ctx
                    .product_boms
                    .get(&product_id)
                    .ok_or(AppError::ProductNotFound)?;
                if bom.is_empty() {
                    return Err(AppError::InvalidOrderItem(
                        "produto sem receita não pode ser vendido".into(),
                    ));
                }
                let unit_cost = pricing::product_unit_cost(bom.iter().map(|(mat, qty)| {
                    (*qty, ctx.material_costs.get(mat).copied().unwrap_or(Decimal::ZERO))
                }));
                (Some(product_id), None, unit_cost)
            }
        };

        planned.push(PlannedItem {
            item_type: item.item_type,
            product_id,
            material_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            unit_cost,
            // Redondo desde já: a coluna guarda o mesmo valor que entrou na conta.
            discount: pricing::round_money(item.discount),
        });
    }

    // 2. Expande receitas e confere o estoque do snapshot
    let requirements = material_requirements(items, &ctx.product_boms)?;
    check_feasibility(&requirements, &ctx.material_names, &ctx.material_stock)?;

    // 3. Fecha a conta e deriva o status
    let paid_amount = pricing::parse_payment_amount(paid_amount_raw);
    if paid_amount < Decimal::ZERO {
        return Err(AppError::InvalidPaymentAmount);
    }

    let amounts: Vec<DraftItemAmounts> = planned
        .iter()
        .map(|p| DraftItemAmounts {
            quantity: p.quantity,
            unit_price: p.unit_price,
            unit_cost: p.unit_cost,
            discount: p.discount,
        })
        .collect();
    let summary = pricing::order_summary(&amounts, paid_amount);
    let status = pricing::derive_status(summary.total_amount, paid_amount);

    Ok(OrderPlan {
        customer_id,
        items: planned,
        requirements,
        total_amount: summary.total_amount,
        total_cost: summary.total_cost,
        paid_amount,
        debt_amount: summary.debt,
        profit: summary.profit,
        status,
        payment_method,
        notes: notes.map(|n| n.to_string()),
        order_date,
    })
}

// --- Serviço ---

#[derive(Clone)]
pub struct SalesService {
    repo: SalesRepository,
    inventory_repo: InventoryRepository,
    catalog_repo: CatalogRepository,
    crm_repo: CrmRepository,
    pool: PgPool,
}

impl SalesService {
    pub fn new(
        repo: SalesRepository,
        inventory_repo: InventoryRepository,
        catalog_repo: CatalogRepository,
        crm_repo: CrmRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            inventory_repo,
            catalog_repo,
            crm_repo,
            pool,
        }
    }

    // =========================================================================
    //  SUBMISSÃO
    // =========================================================================

    pub async fn submit_order(
        &self,
        customer_id: Uuid,
        items: &[DraftOrderItem],
        paid_amount_raw: Option<&str>,
        payment_method: PaymentMethod,
        notes: Option<&str>,
        order_date: Option<DateTime<Utc>>,
    ) -> Result<OrderDetail, AppError> {
        self.crm_repo
            .get_customer_by_id(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let ctx = self.load_plan_context(items).await?;
        let plan = plan_order(
            customer_id,
            items,
            paid_amount_raw,
            payment_method,
            notes,
            order_date,
            &ctx,
        )?;

        let order = self.execute_plan(plan).await?;
        self.get_order_detail(order.id).await
    }

    // Grava o plano inteiro numa transação. O drop da transação em
    // qualquer erro desfaz tudo: pedido nunca fica pela metade.
    async fn execute_plan(&self, plan: OrderPlan) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .repo
            .insert_order(
                &mut *tx,
                plan.customer_id,
                plan.total_amount,
                plan.total_cost,
                plan.paid_amount,
                plan.debt_amount,
                plan.profit,
                plan.status,
                plan.notes.as_deref(),
                plan.order_date,
            )
            .await?;

        for item in &plan.items {
            self.repo
                .insert_order_item(
                    &mut *tx,
                    order.id,
                    item.item_type,
                    item.product_id,
                    item.material_id,
                    item.quantity,
                    item.unit_price,
                    item.unit_cost,
                    item.discount,
                )
                .await?;
        }

        // Baixa condicional: o cheque do snapshot pode ter envelhecido;
        // quem decide é o UPDATE atômico, dentro da mesma transação.
        for (material_id, required) in &plan.requirements {
            let affected = self
                .inventory_repo
                .try_decrement_stock(&mut *tx, *material_id, *required)
                .await?;

            if affected == 0 {
                let (material, available) = self
                    .inventory_repo
                    .get_material_snapshot(&mut *tx, *material_id)
                    .await?
                    .ok_or(AppError::MaterialNotFound)?;

                return Err(AppError::InsufficientStock {
                    material,
                    required: *required,
                    available,
                });
            }
        }

        if plan.paid_amount > Decimal::ZERO {
            self.repo
                .insert_payment(
                    &mut *tx,
                    order.id,
                    plan.paid_amount,
                    plan.payment_method,
                    None,
                )
                .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    // Snapshot do banco para o planejamento: produtos e materiais
    // citados pelos itens, com receita, nome, saldo e custo médio.
    async fn load_plan_context(&self, items: &[DraftOrderItem]) -> Result<PlanContext, AppError> {
        let mut ctx = PlanContext::default();

        for item in items {
            if item.item_type == OrderItemType::Product {
                if let Some(product_id) = item.product_id {
                    if ctx.product_boms.contains_key(&product_id) {
                        continue;
                    }
                    self.catalog_repo
                        .get_product_by_id(product_id)
                        .await?
                        .ok_or(AppError::ProductNotFound)?;

                    let bom = self.catalog_repo.get_bom_for_product(product_id).await?;
                    let mut lines = Vec::with_capacity(bom.len());
                    for row in bom {
                        ctx.material_names.insert(row.material_id, row.material_name);
                        ctx.material_stock.insert(row.material_id, row.current_stock);
                        lines.push((row.material_id, row.quantity_required));
                    }
                    ctx.product_boms.insert(product_id, lines);
                }
            }
        }

        for item in items {
            if item.item_type == OrderItemType::Material {
                if let Some(material_id) = item.material_id {
                    if ctx.material_names.contains_key(&material_id) {
                        continue;
                    }
                    if let Some(material) =
                        self.inventory_repo.get_material_by_id(material_id).await?
                    {
                        ctx.material_stock.insert(material.id, material.current_stock);
                        ctx.material_names.insert(material.id, material.name);
                    }
                    // Material inexistente fica fora do snapshot; o
                    // planejamento recusa o item.
                }
            }
        }

        // Custo médio dos materiais envolvidos, a partir do razão
        let lots = self.inventory_repo.get_all_import_lots().await?;
        let mut lots_by_material: HashMap<Uuid, Vec<(Decimal, Decimal)>> = HashMap::new();
        for (material_id, quantity, unit_price) in lots {
            if ctx.material_names.contains_key(&material_id) {
                lots_by_material
                    .entry(material_id)
                    .or_default()
                    .push((quantity, unit_price));
            }
        }
        ctx.material_costs = lots_by_material
            .into_iter()
            .map(|(id, lots)| (id, pricing::weighted_average_cost(lots)))
            .collect();

        Ok(ctx)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list_orders(
        &self,
        customer_id: Option<Uuid>,
        status: Option<OrderStatus>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderListEntry>, AppError> {
        self.repo.get_orders(customer_id, status, from, to).await
    }

    pub async fn get_order_detail(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self
            .repo
            .get_order_by_id(id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let customer = self
            .crm_repo
            .get_customer_by_id(order.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let items = self.repo.get_items_for_order(id).await?;
        let payments = self.repo.get_payments_for_order(id).await?;

        Ok(OrderDetail {
            order,
            customer_name: customer.name,
            items,
            payments,
        })
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn list_payments(&self, order_id: Uuid) -> Result<Vec<Payment>, AppError> {
        self.repo
            .get_order_by_id(order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        self.repo.get_payments_for_order(order_id).await
    }

    // Registra o pagamento e refaz paid/debt/status do cabeçalho na
    // mesma transação, com o pedido travado (FOR UPDATE): pagamentos
    // simultâneos se serializam em vez de se atropelar.
    pub async fn record_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
        payment_method: PaymentMethod,
        notes: Option<&str>,
    ) -> Result<Payment, AppError> {
        let amount = pricing::round_money(amount);
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidPaymentAmount);
        }

        let mut tx = self.pool.begin().await?;

        let order = self
            .repo
            .get_order_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let payment = self
            .repo
            .insert_payment(&mut *tx, order_id, amount, payment_method, notes)
            .await?;

        let paid_amount = self.repo.sum_payments_for_order(&mut *tx, order_id).await?;
        let debt_amount = order.total_amount - paid_amount;
        let status = pricing::derive_status(order.total_amount, paid_amount);

        self.repo
            .update_order_payment_state(&mut *tx, order_id, paid_amount, debt_amount, status)
            .await?;

        tx.commit().await?;
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn material_item(material_id: Uuid, quantity: Decimal, unit_price: Decimal) -> DraftOrderItem {
        DraftOrderItem {
            item_type: OrderItemType::Material,
            product_id: None,
            material_id: Some(material_id),
            quantity,
            unit_price,
            discount: Decimal::ZERO,
        }
    }

    fn product_item(product_id: Uuid, quantity: Decimal, unit_price: Decimal) -> DraftOrderItem {
        DraftOrderItem {
            item_type: OrderItemType::Product,
            product_id: Some(product_id),
            material_id: None,
            quantity,
            unit_price,
            discount: Decimal::ZERO,
        }
    }

    // Cenário base: tecido (estoque 30, custo 12.50) e linha (estoque
    // 50, custo 2.00); bolsa = 2 tecido + 1 linha.
    struct Cenario {
        tecido: Uuid,
        linha: Uuid,
        bolsa: Uuid,
        ctx: PlanContext,
    }

    fn cenario() -> Cenario {
        let tecido = Uuid::new_v4();
        let linha = Uuid::new_v4();
        let bolsa = Uuid::new_v4();

        let mut ctx = PlanContext::default();
        ctx.material_names.insert(tecido, "Tecido".to_string());
        ctx.material_names.insert(linha, "Linha".to_string());
        ctx.material_stock.insert(tecido, dec!(30));
        ctx.material_stock.insert(linha, dec!(50));
        ctx.material_costs.insert(tecido, dec!(12.50));
        ctx.material_costs.insert(linha, dec!(2.00));
        ctx.product_boms
            .insert(bolsa, vec![(tecido, dec!(2)), (linha, dec!(1))]);

        Cenario {
            tecido,
            linha,
            bolsa,
            ctx,
        }
    }

    fn plan(
        items: &[DraftOrderItem],
        paid: Option<&str>,
        ctx: &PlanContext,
    ) -> Result<OrderPlan, AppError> {
        plan_order(
            Uuid::new_v4(),
            items,
            paid,
            PaymentMethod::Cash,
            None,
            None,
            ctx,
        )
    }

    // --- Expansão de receita e exigências ---

    #[test]
    fn exigencias_expandem_a_receita_pela_quantidade() {
        let c = cenario();
        let items = [product_item(c.bolsa, dec!(5), dec!(100))];

        let reqs = material_requirements(&items, &c.ctx.product_boms).unwrap();
        let reqs: HashMap<Uuid, Decimal> = reqs.into_iter().collect();

        assert_eq!(reqs[&c.tecido], dec!(10)); // 2 × 5
        assert_eq!(reqs[&c.linha], dec!(5)); // 1 × 5
    }

    #[test]
    fn exigencias_somam_itens_que_dividem_material() {
        let c = cenario();
        // 5 bolsas (10 de tecido) + 3 de tecido avulso = 13
        let items = [
            product_item(c.bolsa, dec!(5), dec!(100)),
            material_item(c.tecido, dec!(3), dec!(15)),
        ];

        let reqs = material_requirements(&items, &c.ctx.product_boms).unwrap();
        let reqs: HashMap<Uuid, Decimal> = reqs.into_iter().collect();

        assert_eq!(reqs[&c.tecido], dec!(13));
    }

    #[test]
    fn exigencias_saem_ordenadas_por_material() {
        let c = cenario();
        let items = [
            material_item(c.tecido, dec!(1), dec!(10)),
            material_item(c.linha, dec!(1), dec!(5)),
        ];

        let reqs = material_requirements(&items, &c.ctx.product_boms).unwrap();
        let ids: Vec<Uuid> = reqs.iter().map(|(id, _)| *id).collect();
        let mut sorted = ids.clone();
        sorted.sort();

        assert_eq!(ids, sorted);
    }

    // --- Cheque de estoque ---

    #[test]
    fn material_alem_do_saldo_e_recusado_com_os_numeros() {
        let c = cenario();
        let items = [material_item(c.tecido, dec!(50), dec!(15))];

        match plan(&items, None, &c.ctx) {
            Err(AppError::InsufficientStock {
                material,
                required,
                available,
            }) => {
                assert_eq!(material, "Tecido");
                assert_eq!(required, dec!(50));
                assert_eq!(available, dec!(30));
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
    }

    #[test]
    fn receita_que_estoura_um_material_derruba_o_pedido() {
        let c = cenario();
        // 16 bolsas pedem 32 de tecido; só há 30
        let items = [product_item(c.bolsa, dec!(16), dec!(100))];

        match plan(&items, None, &c.ctx) {
            Err(AppError::InsufficientStock { material, required, available }) => {
                assert_eq!(material, "Tecido");
                assert_eq!(required, dec!(32));
                assert_eq!(available, dec!(30));
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
    }

    #[test]
    fn pedido_inviavel_nao_gera_plano() {
        // Nenhuma escrita existe sem plano: a recusa acontece antes de
        // qualquer transação começar.
        let c = cenario();
        let items = [material_item(c.tecido, dec!(31), dec!(15))];

        assert!(plan(&items, Some("100"), &c.ctx).is_err());
    }

    #[test]
    fn pedido_no_limite_do_saldo_passa() {
        let c = cenario();
        let items = [material_item(c.tecido, dec!(30), dec!(15))];

        assert!(plan(&items, None, &c.ctx).is_ok());
    }

    // --- Resolução de custo ---

    #[test]
    fn custo_do_item_de_material_vem_da_media() {
        let c = cenario();
        let items = [material_item(c.tecido, dec!(2), dec!(20))];

        let plan = plan(&items, None, &c.ctx).unwrap();
        assert_eq!(plan.items[0].unit_cost, dec!(12.50));
    }

    #[test]
    fn custo_do_produto_soma_a_receita() {
        let c = cenario();
        let items = [product_item(c.bolsa, dec!(1), dec!(100))];

        let plan = plan(&items, None, &c.ctx).unwrap();
        // 2 × 12.50 + 1 × 2.00
        assert_eq!(plan.items[0].unit_cost, dec!(27.00));
    }

    #[test]
    fn material_sem_importacao_tem_custo_zero() {
        let mut c = cenario();
        c.ctx.material_costs.remove(&c.tecido);
        let items = [material_item(c.tecido, dec!(1), dec!(20))];

        let plan = plan(&items, None, &c.ctx).unwrap();
        assert_eq!(plan.items[0].unit_cost, Decimal::ZERO);
    }

    // --- Totais e status ---

    #[test]
    fn plano_fecha_totais_e_status() {
        let c = cenario();
        // 2 bolsas a 100 = 200; custo 2 × 27 = 54; pago 50
        let items = [product_item(c.bolsa, dec!(2), dec!(100))];

        let plan = plan(&items, Some("50"), &c.ctx).unwrap();

        assert_eq!(plan.total_amount, dec!(200.00));
        assert_eq!(plan.total_cost, dec!(54.00));
        assert_eq!(plan.profit, dec!(146.00));
        assert_eq!(plan.paid_amount, dec!(50));
        assert_eq!(plan.debt_amount, dec!(150.00));
        assert_eq!(plan.status, OrderStatus::PartialPaid);
    }

    #[test]
    fn pagamento_a_maior_completa_e_deixa_divida_negativa() {
        let c = cenario();
        let items = [product_item(c.bolsa, dec!(1), dec!(100))];

        let plan = plan(&items, Some("120"), &c.ctx).unwrap();

        assert_eq!(plan.status, OrderStatus::Completed);
        assert_eq!(plan.debt_amount, dec!(-20.00));
    }

    #[test]
    fn pagamento_ilegivel_vira_pedido_pendente() {
        let c = cenario();
        let items = [product_item(c.bolsa, dec!(1), dec!(100))];

        let plan = plan(&items, Some("abc"), &c.ctx).unwrap();

        assert_eq!(plan.paid_amount, Decimal::ZERO);
        assert_eq!(plan.status, OrderStatus::Pending);
    }

    #[test]
    fn pagamento_negativo_e_recusado() {
        let c = cenario();
        let items = [product_item(c.bolsa, dec!(1), dec!(100))];

        assert!(matches!(
            plan(&items, Some("-10"), &c.ctx),
            Err(AppError::InvalidPaymentAmount)
        ));
    }

    // --- Recusas estruturais ---

    #[test]
    fn pedido_vazio_e_recusado() {
        let c = cenario();
        assert!(matches!(plan(&[], None, &c.ctx), Err(AppError::EmptyOrder)));
    }

    #[test]
    fn quantidade_nao_positiva_e_recusada() {
        let c = cenario();
        let items = [material_item(c.tecido, dec!(0), dec!(15))];

        assert!(matches!(
            plan(&items, None, &c.ctx),
            Err(AppError::InvalidOrderItem(_))
        ));
    }

    #[test]
    fn item_sem_referencia_do_seu_tipo_e_recusado() {
        let c = cenario();
        let items = [DraftOrderItem {
            item_type: OrderItemType::Material,
            product_id: None,
            material_id: None,
            quantity: dec!(1),
            unit_price: dec!(10),
            discount: Decimal::ZERO,
        }];

        assert!(matches!(
            plan(&items, None, &c.ctx),
            Err(AppError::InvalidOrderItem(_))
        ));
    }

    #[test]
    fn produto_sem_receita_nao_pode_ser_vendido() {
        let mut c = cenario();
        let vazio = Uuid::new_v4();
        c.ctx.product_boms.insert(vazio, Vec::new());
        let items = [product_item(vazio, dec!(1), dec!(100))];

        assert!(matches!(
            plan(&items, None, &c.ctx),
            Err(AppError::InvalidOrderItem(_))
        ));
    }

    #[test]
    fn produto_desconhecido_e_recusado() {
        let c = cenario();
        let items = [product_item(Uuid::new_v4(), dec!(1), dec!(100))];

        assert!(matches!(
            plan(&items, None, &c.ctx),
            Err(AppError::ProductNotFound)
        ));
    }

    #[test]
    fn material_desconhecido_e_recusado() {
        let c = cenario();
        let items = [material_item(Uuid::new_v4(), dec!(1), dec!(10))];

        assert!(matches!(
            plan(&items, None, &c.ctx),
            Err(AppError::MaterialNotFound)
        ));
    }
}
