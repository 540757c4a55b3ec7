// src/services.rs

pub mod catalog_service;
pub mod crm_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod pricing;
pub mod sales_service;

pub use catalog_service::CatalogService;
pub use crm_service::CrmService;
pub use dashboard_service::DashboardService;
pub use inventory_service::InventoryService;
pub use sales_service::SalesService;
