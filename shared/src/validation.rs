//! Header summary checks
//!
//! Sale and purchase order headers carry caller-supplied totals. These
//! functions recompute them from the line items so a header can never
//! disagree with its lines.

use rust_decimal::Decimal;
use thiserror::Error;

/// A header total that does not match its line items
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct SummaryMismatch {
    pub field: &'static str,
    pub message: String,
}

impl SummaryMismatch {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Line quantities must be strictly positive
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be a positive integer");
    }
    Ok(())
}

/// Money amounts are never negative
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Check a sale header against its `(qty, unit price)` lines.
///
/// The sale amount must equal the sum of line totals and the paid and
/// outstanding parts must add up to the sale amount.
pub fn validate_sale_totals(
    sale_amount: Decimal,
    paid_amount: Decimal,
    balance_amount: Decimal,
    lines: &[(i32, Decimal)],
) -> Result<(), SummaryMismatch> {
    for (field, amount) in [
        ("saleAmount", sale_amount),
        ("paidAmount", paid_amount),
        ("balanceAmount", balance_amount),
    ] {
        validate_amount(amount).map_err(|m| SummaryMismatch::new(field, m))?;
    }

    let mut computed = Decimal::ZERO;
    for (index, &(qty, price)) in lines.iter().enumerate() {
        computed = Decimal::from(qty)
            .checked_mul(price)
            .and_then(|line| computed.checked_add(line))
            .ok_or_else(|| {
                SummaryMismatch::new(
                    "saleAmount",
                    format!("item {}: line total out of range", index),
                )
            })?;
    }
    if computed != sale_amount {
        return Err(SummaryMismatch::new(
            "saleAmount",
            format!("Sale amount {} does not match line total {}", sale_amount, computed),
        ));
    }

    if paid_amount.checked_add(balance_amount) != Some(sale_amount) {
        return Err(SummaryMismatch::new(
            "balanceAmount",
            format!(
                "Paid {} plus balance {} must equal sale amount {}",
                paid_amount, balance_amount, sale_amount
            ),
        ));
    }

    Ok(())
}

/// A purchase order line as `(quantity, unit cost, sub total)`
pub type PurchaseLine = (i32, Decimal, Decimal);

/// Check a purchase order header against its lines.
///
/// Each line's sub total must be quantity times unit cost and the
/// outstanding balance cannot exceed the order total.
pub fn validate_purchase_totals(
    total_amount: Decimal,
    balance_amount: Decimal,
    charges: &[(&'static str, Decimal)],
    lines: &[PurchaseLine],
) -> Result<(), SummaryMismatch> {
    validate_amount(total_amount).map_err(|m| SummaryMismatch::new("totalAmount", m))?;
    validate_amount(balance_amount).map_err(|m| SummaryMismatch::new("balanceAmount", m))?;
    for &(field, amount) in charges {
        validate_amount(amount).map_err(|m| SummaryMismatch::new(field, m))?;
    }

    for (index, (quantity, unit_cost, sub_total)) in lines.iter().enumerate() {
        validate_amount(*unit_cost)
            .map_err(|m| SummaryMismatch::new("unitCost", format!("item {}: {}", index, m)))?;
        let expected = Decimal::from(*quantity).checked_mul(*unit_cost);
        if expected != Some(*sub_total) {
            return Err(SummaryMismatch::new(
                "subTotal",
                format!(
                    "item {}: sub total {} does not match {} x {}",
                    index, sub_total, quantity, unit_cost
                ),
            ));
        }
    }

    if balance_amount > total_amount {
        return Err(SummaryMismatch::new(
            "balanceAmount",
            "Balance cannot exceed the order total",
        ));
    }

    Ok(())
}
