pub mod demand;
pub mod inventory;
pub mod purchase_order;
