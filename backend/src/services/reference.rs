//! Human-readable reference numbers for transaction headers

use chrono::Utc;
use uuid::Uuid;

/// Header kinds that carry a reference number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Adjustment,
    PurchaseOrder,
    Sale,
}

impl ReferenceKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReferenceKind::Adjustment => "ADJ",
            ReferenceKind::PurchaseOrder => "PO",
            ReferenceKind::Sale => "SL",
        }
    }
}

/// Generate `<PREFIX>-<yyyymmddHHMMSS>-<6 hex>`.
///
/// The random suffix keeps numbers generated within the same second apart;
/// the unique index on the header table is the final guard.
pub fn generate_order_number(kind: ReferenceKind) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        kind.prefix(),
        Utc::now().format("%Y%m%d%H%M%S"),
        suffix[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number(ReferenceKind::PurchaseOrder);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PO");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_order_numbers_differ() {
        let a = generate_order_number(ReferenceKind::Sale);
        let b = generate_order_number(ReferenceKind::Sale);
        assert!(a.starts_with("SL-"));
        assert_ne!(a, b);
    }
}
