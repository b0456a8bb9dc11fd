//! HTTP handlers

pub mod adjustment;
pub mod customer;
pub mod health;
pub mod notification;
pub mod product;
pub mod purchase_order;
pub mod sale;

pub use adjustment::*;
pub use customer::*;
pub use health::*;
pub use notification::*;
pub use product::*;
pub use purchase_order::*;
pub use sale::*;
