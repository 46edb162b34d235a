use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::Gradient;
use crate::data::model::{AggregationResult, Ranking};

// ---------------------------------------------------------------------------
// Ranked bar charts (central panel)
// ---------------------------------------------------------------------------

const BAR_HEIGHT: f32 = 26.0;
const MIN_CHART_HEIGHT: f32 = 120.0;

/// All four rankings, two per row.
pub fn ranking_charts(ui: &mut Ui, result: &AggregationResult) {
    ui.columns(2, |cols| {
        ranking_chart(
            &mut cols[0],
            "Sales by Category",
            "Sales",
            &result.sales_by_category,
            Gradient::Viridis,
        );
        ranking_chart(
            &mut cols[1],
            "Profit by Region",
            "Profit",
            &result.profit_by_region,
            Gradient::Magma,
        );
    });
    ui.add_space(12.0);
    ui.columns(2, |cols| {
        ranking_chart(
            &mut cols[0],
            "Top 10 Products by Profit",
            "Profit",
            &result.top10_profit_by_product,
            Gradient::Coolwarm,
        );
        ranking_chart(
            &mut cols[1],
            "Sales Distribution by State",
            "Sales",
            &result.sales_by_state,
            Gradient::Plasma,
        );
    });
}

/// Horizontal bar chart of one ranking; the first entry is drawn at the top.
pub fn ranking_chart(ui: &mut Ui, title: &str, value_label: &str, ranking: &Ranking, gradient: Gradient) {
    ui.label(RichText::new(title).strong());

    if ranking.is_empty() {
        ui.weak("No rows match the current filters.");
        return;
    }

    let n = ranking.len();
    let colors = gradient.colors(n);
    let bars: Vec<Bar> = ranking
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (entry, color))| {
            Bar::new(bar_position(i, n), entry.value)
                .name(&entry.key)
                .fill(color)
                .width(0.7)
        })
        .collect();

    // Axis labels are looked up by bar position.
    let labels: Vec<String> = (0..n).map(|pos| ranking[n - 1 - pos].key.clone()).collect();

    Plot::new(title)
        .height((n as f32 * BAR_HEIGHT).max(MIN_CHART_HEIGHT))
        .x_axis_label(value_label)
        .include_x(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_grid([true, false])
        .y_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Plot position of the `index`-th entry of an `n`-entry ranking.
fn bar_position(index: usize, n: usize) -> f64 {
    (n - 1 - index) as f64
}

fn axis_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_is_topmost() {
        assert_eq!(bar_position(0, 4), 3.0);
        assert_eq!(bar_position(3, 4), 0.0);
    }

    #[test]
    fn test_axis_label_only_on_bar_positions() {
        let labels = vec!["low".to_string(), "high".to_string()];
        assert_eq!(axis_label(&labels, 1.0), "high");
        assert_eq!(axis_label(&labels, 0.0), "low");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, -1.0), "");
        assert_eq!(axis_label(&labels, 7.0), "");
    }
}
