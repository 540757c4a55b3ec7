// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- CRM ---
        handlers::crm::create_customer,
        handlers::crm::list_customers,
        handlers::crm::get_customer,
        handlers::crm::update_customer,
        handlers::crm::delete_customer,
        handlers::crm::list_debts,
        handlers::crm::get_customer_debt,
        handlers::crm::create_debt_adjustment,
        handlers::crm::list_debt_adjustments,

        // --- INVENTORY ---
        handlers::inventory::create_material,
        handlers::inventory::list_materials,
        handlers::inventory::get_material,
        handlers::inventory::get_material_cost,
        handlers::inventory::update_material,
        handlers::inventory::delete_material,
        handlers::inventory::create_import,
        handlers::inventory::list_imports,
        handlers::inventory::bulk_import,

        // --- CATALOG ---
        handlers::catalog::create_product,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::catalog::get_product_cost,
        handlers::catalog::cost_preview,

        // --- SALES ---
        handlers::sales::submit_order,
        handlers::sales::list_orders,
        handlers::sales::get_order,
        handlers::sales::create_payment,
        handlers::sales::list_payments,

        // --- DASHBOARD ---
        handlers::dashboard::get_overview,
        handlers::dashboard::get_sales_chart,
        handlers::dashboard::get_top_products,
    ),
    components(
        schemas(
            // --- CRM ---
            models::crm::Customer,
            models::crm::DebtAdjustment,
            models::crm::CustomerDebtDetail,
            handlers::crm::CreateCustomerPayload,
            handlers::crm::UpdateCustomerPayload,
            handlers::crm::CreateDebtAdjustmentPayload,

            // --- INVENTORY ---
            models::inventory::Material,
            models::inventory::MaterialImport,
            models::inventory::ImportHistoryEntry,
            models::inventory::MaterialCost,
            models::inventory::MaterialWithCost,
            models::inventory::SkippedBulkRow,
            models::inventory::BulkImportReport,
            handlers::inventory::CreateMaterialPayload,
            handlers::inventory::UpdateMaterialPayload,
            handlers::inventory::CreateImportPayload,
            handlers::inventory::BulkImportPayload,

            // --- CATALOG ---
            models::catalog::Product,
            models::catalog::ProductMaterial,
            models::catalog::BomLineDetail,
            models::catalog::ProductOverview,
            models::catalog::ProductDetail,
            models::catalog::CostPreview,
            handlers::catalog::BomLinePayload,
            handlers::catalog::CreateProductPayload,
            handlers::catalog::UpdateProductPayload,
            handlers::catalog::CostPreviewPayload,

            // --- SALES ---
            models::sales::OrderStatus,
            models::sales::OrderItemType,
            models::sales::PaymentMethod,
            models::sales::Order,
            models::sales::OrderItem,
            models::sales::Payment,
            models::sales::OrderListEntry,
            models::sales::OrderItemDetail,
            models::sales::OrderDetail,
            handlers::sales::OrderItemPayload,
            handlers::sales::SubmitOrderPayload,
            handlers::sales::CreatePaymentPayload,

            // --- DASHBOARD ---
            models::dashboard::SystemOverview,
            models::dashboard::SalesChartEntry,
            models::dashboard::TopProductEntry,
        )
    ),
    tags(
        (name = "CRM", description = "Clientes e controle de fiado"),
        (name = "Inventory", description = "Matéria-prima, importações e custo médio"),
        (name = "Catalog", description = "Produtos e receitas (BOM)"),
        (name = "Sales", description = "Pedidos e pagamentos"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais")
    )
)]
pub struct ApiDoc;
