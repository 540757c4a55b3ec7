// src/models.rs

pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod inventory;
pub mod sales;
