//! Business logic for the inventory-consistency core

pub mod adjustment;
pub mod customer;
pub mod ledger;
pub mod notification;
pub mod product;
pub mod purchase_order;
pub mod reference;
pub mod sale;

pub use adjustment::AdjustmentService;
pub use customer::CustomerService;
pub use ledger::{AlertRule, StockLedger};
pub use notification::{NotificationEmitter, NotificationService};
pub use product::ProductService;
pub use purchase_order::PurchaseOrderService;
pub use sale::SaleService;
