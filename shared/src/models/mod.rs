//! Domain models for the POS back office

mod adjustment;
mod notification;
mod party;
mod product;
mod purchase_order;
mod sale;

pub use adjustment::*;
pub use notification::*;
pub use party::*;
pub use product::*;
pub use purchase_order::*;
pub use sale::*;
