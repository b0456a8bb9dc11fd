//! Sales summaries bucketed by period and tender

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{PaymentMethod, PaymentStatus, Sale};

/// What the summaries need to know about a sale
pub trait Tender {
    fn payment_method(&self) -> PaymentMethod;
    fn balance_amount(&self) -> Decimal;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Tender for Sale {
    fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    fn balance_amount(&self) -> Decimal {
        self.balance_amount
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Reduced sale view used by the cross-shop summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDigest {
    pub shop_id: Uuid,
    pub payment_method: PaymentMethod,
    pub balance_amount: Decimal,
    pub sale_amount: Decimal,
    pub sale_type: PaymentStatus,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl From<&Sale> for SaleDigest {
    fn from(sale: &Sale) -> Self {
        Self {
            shop_id: sale.shop_id,
            payment_method: sale.payment_method,
            balance_amount: sale.balance_amount,
            sale_amount: sale.sale_amount,
            sale_type: sale.sale_type,
            created_at: sale.created_at,
        }
    }
}

impl Tender for SaleDigest {
    fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    fn balance_amount(&self) -> Decimal {
        self.balance_amount
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Sales in one period split by how they were paid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBreakdown<T> {
    pub total: Vec<T>,
    pub sales_paid_in_cash: Vec<T>,
    pub sales_paid_in_credit: Vec<T>,
    pub sales_by_mobile_money: Vec<T>,
    pub sales_by_hand_cash: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary<T> {
    pub today: SalesBreakdown<T>,
    pub this_week: SalesBreakdown<T>,
    pub this_month: SalesBreakdown<T>,
    pub all_time: SalesBreakdown<T>,
}

/// Half-open `[start, end)` interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Calendar periods around a reference instant. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub today: Period,
    pub this_week: Period,
    pub this_month: Period,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

impl PeriodBounds {
    pub fn around(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);

        let back = i64::from(today.weekday().num_days_from_sunday());
        let week_start = today - chrono::Duration::days(back);
        let week_end = week_start + chrono::Duration::days(7);

        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        let month_end = month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);

        Self {
            today: Period {
                start: midnight(today),
                end: midnight(tomorrow),
            },
            this_week: Period {
                start: midnight(week_start),
                end: midnight(week_end),
            },
            this_month: Period {
                start: midnight(month_start),
                end: midnight(month_end),
            },
        }
    }
}

/// Split sales by tender.
///
/// Cash and hand-cash are the same rule: cash with nothing outstanding.
/// Anything with a positive balance counts as credit regardless of method.
pub fn categorize<T: Tender + Clone>(sales: &[T]) -> SalesBreakdown<T> {
    let pick = |rule: &dyn Fn(&T) -> bool| -> Vec<T> {
        sales.iter().filter(|s| rule(s)).cloned().collect()
    };
    let cash_settled =
        |s: &T| s.payment_method() == PaymentMethod::Cash && s.balance_amount() <= Decimal::ZERO;

    SalesBreakdown {
        total: sales.to_vec(),
        sales_paid_in_cash: pick(&cash_settled),
        sales_paid_in_credit: pick(&|s: &T| s.balance_amount() > Decimal::ZERO),
        sales_by_mobile_money: pick(&|s: &T| s.payment_method() == PaymentMethod::MobileMoney),
        sales_by_hand_cash: pick(&cash_settled),
    }
}

/// Bucket an already fetched set of sales into the four reporting periods
pub fn summarize<T: Tender + Clone>(sales: &[T], now: DateTime<Utc>) -> SalesSummary<T> {
    let bounds = PeriodBounds::around(now);
    let within = |period: Period| -> Vec<T> {
        sales
            .iter()
            .filter(|s| period.contains(s.created_at()))
            .cloned()
            .collect()
    };

    SalesSummary {
        today: categorize(&within(bounds.today)),
        this_week: categorize(&within(bounds.this_week)),
        this_month: categorize(&within(bounds.this_month)),
        all_time: categorize(sales),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn digest(method: PaymentMethod, balance: Decimal, at: DateTime<Utc>) -> SaleDigest {
        SaleDigest {
            shop_id: Uuid::nil(),
            payment_method: method,
            balance_amount: balance,
            sale_amount: dec!(100),
            sale_type: if balance > Decimal::ZERO {
                PaymentStatus::Credit
            } else {
                PaymentStatus::Paid
            },
            created_at: at,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // Wednesday
        let bounds = PeriodBounds::around(at(2026, 10, 14, 15));
        assert_eq!(bounds.this_week.start, at(2026, 10, 11, 0));
        assert_eq!(bounds.this_week.end, at(2026, 10, 18, 0));
        assert_eq!(bounds.today.start, at(2026, 10, 14, 0));
        assert_eq!(bounds.today.end, at(2026, 10, 15, 0));
    }

    #[test]
    fn test_month_rolls_over_year_end() {
        let bounds = PeriodBounds::around(at(2026, 12, 31, 23));
        assert_eq!(bounds.this_month.start, at(2026, 12, 1, 0));
        assert_eq!(bounds.this_month.end, at(2027, 1, 1, 0));
    }

    #[test]
    fn test_categorize_by_tender() {
        let now = at(2026, 10, 14, 12);
        let sales = vec![
            digest(PaymentMethod::Cash, Decimal::ZERO, now),
            digest(PaymentMethod::Cash, dec!(20), now),
            digest(PaymentMethod::MobileMoney, Decimal::ZERO, now),
            digest(PaymentMethod::MobileMoney, dec!(5), now),
        ];
        let b = categorize(&sales);
        assert_eq!(b.total.len(), 4);
        assert_eq!(b.sales_paid_in_cash.len(), 1);
        assert_eq!(b.sales_by_hand_cash, b.sales_paid_in_cash);
        assert_eq!(b.sales_paid_in_credit.len(), 2);
        assert_eq!(b.sales_by_mobile_money.len(), 2);
    }

    #[test]
    fn test_summarize_buckets_by_period() {
        let now = at(2026, 10, 14, 12);
        let sales = vec![
            digest(PaymentMethod::Cash, Decimal::ZERO, at(2026, 10, 14, 9)),
            digest(PaymentMethod::Cash, Decimal::ZERO, at(2026, 10, 12, 9)),
            digest(PaymentMethod::Cash, Decimal::ZERO, at(2026, 10, 2, 9)),
            digest(PaymentMethod::Cash, Decimal::ZERO, at(2026, 9, 30, 9)),
        ];
        let summary = summarize(&sales, now);
        assert_eq!(summary.today.total.len(), 1);
        assert_eq!(summary.this_week.total.len(), 2);
        assert_eq!(summary.this_month.total.len(), 3);
        assert_eq!(summary.all_time.total.len(), 4);
    }
}
