//! Key metric cards and the derived Average Order Value

use crate::models::{AnalysisResult, MetricValue};
use rust_decimal::{Decimal, RoundingStrategy};

pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const TOTAL_TRANSACTIONS: &str = "Total Transactions";
pub const UNIQUE_CUSTOMERS: &str = "Unique Customers";
pub const AVERAGE_ORDER_VALUE: &str = "Average Order Value";

const NOT_AVAILABLE: &str = "N/A";

/// One card of the metrics block
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
}

/// Parse the longest leading decimal number of `s`, ignoring leading
/// whitespace. `"12.5abc"` parses as 12.5, `"abc"` does not parse.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Optional exponent, only consumed when complete
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Numeric reading of a metric value
pub fn numeric(value: &MetricValue) -> Option<f64> {
    match value {
        MetricValue::Number(n) => Some(*n),
        MetricValue::Text(s) => parse_decimal(s),
    }
}

/// Parse a currency display string such as `"$1,234.50"`
pub fn parse_currency(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    parse_decimal(&cleaned)
}

/// `$x.xx` with exact halves rounded away from zero
fn format_currency(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut cents = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            cents.rescale(2);
            format!("${}", cents)
        }
        None => format!("${:.2}", value),
    }
}

/// Total revenue divided by the transaction count, formatted `$x.xx`.
///
/// Yields `"N/A"` whenever either input is missing or `N/A`, the transaction
/// count is not strictly positive, or the revenue does not parse.
pub fn average_order_value(revenue: Option<&MetricValue>, transactions: Option<&MetricValue>) -> String {
    let (Some(revenue), Some(transactions)) = (revenue, transactions) else {
        return NOT_AVAILABLE.to_string();
    };
    if revenue.is_not_available() || transactions.is_not_available() {
        return NOT_AVAILABLE.to_string();
    }

    let count = match numeric(transactions) {
        Some(n) if n > 0.0 && n.is_finite() => n,
        _ => return NOT_AVAILABLE.to_string(),
    };
    let total = match revenue {
        MetricValue::Number(n) => Some(*n),
        MetricValue::Text(s) => parse_currency(s),
    };

    match total {
        Some(total) if total.is_finite() => format_currency(total / count),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// The four-card block, present only when all three source metrics are
pub fn metric_cards(result: &AnalysisResult) -> Option<Vec<MetricCard>> {
    let revenue = result.metric(TOTAL_REVENUE)?;
    let transactions = result.metric(TOTAL_TRANSACTIONS)?;
    let customers = result.metric(UNIQUE_CUSTOMERS)?;

    let aov = average_order_value(Some(&revenue), Some(&transactions));

    Some(vec![
        MetricCard { title: TOTAL_REVENUE, value: revenue.to_string() },
        MetricCard { title: TOTAL_TRANSACTIONS, value: transactions.to_string() },
        MetricCard { title: AVERAGE_ORDER_VALUE, value: aov },
        MetricCard { title: UNIQUE_CUSTOMERS, value: customers.to_string() },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> MetricValue {
        MetricValue::Text(s.to_string())
    }

    #[test]
    fn test_aov_from_currency_string() {
        assert_eq!(
            average_order_value(Some(&text("$1,000.00")), Some(&MetricValue::Number(4.0))),
            "$250.00"
        );
    }

    #[test]
    fn test_aov_rounds_halves_up() {
        assert_eq!(
            average_order_value(Some(&text("$10.50")), Some(&MetricValue::Number(4.0))),
            "$2.63"
        );
        assert_eq!(
            average_order_value(Some(&MetricValue::Number(0.125)), Some(&MetricValue::Number(1.0))),
            "$0.13"
        );
        assert_eq!(
            average_order_value(Some(&text("$100.00")), Some(&MetricValue::Number(3.0))),
            "$33.33"
        );
    }

    #[test]
    fn test_aov_zero_transactions() {
        assert_eq!(
            average_order_value(Some(&text("$1,000.00")), Some(&MetricValue::Number(0.0))),
            "N/A"
        );
    }

    #[test]
    fn test_aov_not_available_inputs() {
        assert_eq!(average_order_value(Some(&text("N/A")), Some(&MetricValue::Number(4.0))), "N/A");
        assert_eq!(average_order_value(Some(&text("$10.00")), Some(&text("N/A"))), "N/A");
        assert_eq!(average_order_value(None, Some(&MetricValue::Number(4.0))), "N/A");
    }

    #[test]
    fn test_aov_unparseable_revenue_is_not_nan() {
        assert_eq!(average_order_value(Some(&text("lots")), Some(&text("3"))), "N/A");
    }

    #[test]
    fn test_aov_transactions_as_text() {
        assert_eq!(average_order_value(Some(&text("$99.00")), Some(&text("3"))), "$33.00");
    }

    #[test]
    fn test_parse_decimal_prefix() {
        assert_eq!(parse_decimal("  12.5abc"), Some(12.5));
        assert_eq!(parse_decimal("-3"), Some(-3.0));
        assert_eq!(parse_decimal(".5"), Some(0.5));
        assert_eq!(parse_decimal("1e3x"), Some(1000.0));
        assert_eq!(parse_decimal("7e"), Some(7.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("."), None);
    }

    #[test]
    fn test_metric_cards_order() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "Total Revenue": "$1,000.00",
            "Total Transactions": 4,
            "Unique Customers": 3
        }))
        .unwrap();

        let cards = metric_cards(&result).unwrap();
        let titles: Vec<_> = cards.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            vec![TOTAL_REVENUE, TOTAL_TRANSACTIONS, AVERAGE_ORDER_VALUE, UNIQUE_CUSTOMERS]
        );
        assert_eq!(cards[1].value, "4");
        assert_eq!(cards[2].value, "$250.00");
    }

    #[test]
    fn test_metric_cards_with_zero_transactions() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "Total Revenue": "$5.00",
            "Total Transactions": 0,
            "Unique Customers": 1
        }))
        .unwrap();

        let cards = metric_cards(&result).unwrap();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[1].value, "0");
        assert_eq!(cards[2].value, "N/A");
    }

    #[test]
    fn test_metric_cards_need_all_three() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "Total Revenue": "$1,000.00",
            "Total Transactions": 4
        }))
        .unwrap();
        assert!(metric_cards(&result).is_none());
    }
}
