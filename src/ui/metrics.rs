use eframe::egui::{RichText, Ui};

use crate::data::model::AggregationResult;

// ---------------------------------------------------------------------------
// Key metrics row
// ---------------------------------------------------------------------------

/// Render total sales, total profit and order count side by side.
///
/// When the filter narrows the view, the whole-table figure is shown under each
/// metric.
pub fn metrics_row(ui: &mut Ui, result: &AggregationResult, overall: &AggregationResult) {
    let narrowed = result != overall;
    let of = |text: String| narrowed.then(|| format!("of {text} overall"));
    ui.columns(3, |cols| {
        metric(
            &mut cols[0],
            "Total Sales",
            format_currency(result.total_sales),
            of(format_currency(overall.total_sales)),
        );
        metric(
            &mut cols[1],
            "Total Profit",
            format_currency(result.total_profit),
            of(format_currency(overall.total_profit)),
        );
        metric(
            &mut cols[2],
            "Orders",
            format_count(result.total_orders),
            of(format_count(overall.total_orders)),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String, overall: Option<String>) {
    ui.label(label);
    ui.label(RichText::new(value).heading().strong());
    if let Some(text) = overall {
        ui.weak(text);
    }
}

/// `1234.5` → `$1,234.50`, `-3.2` → `-$3.20`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// `1234567` → `1,234,567`.
pub fn format_count(value: usize) -> String {
    group_thousands(value as u64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(180.0), "$180.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(2_297_200.8603), "$2,297,200.86");
        assert_eq!(format_currency(-6.871), "-$6.87");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(9_994), "9,994");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
