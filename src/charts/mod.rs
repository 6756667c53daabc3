//! Concrete charts of the conflict and arms-revenue dashboard.

mod chord;
mod line;
mod map;
pub mod palette;
mod pie;
mod revenue_bar;
mod stream;

pub use chord::ActorChordChart;
pub use line::ConflictMetricsLineChart;
pub use map::{ConflictMapChart, ZOOM_IN_CONTROL_ID, ZOOM_OUT_CONTROL_ID, ZOOM_RESET_CONTROL_ID};
pub use pie::RevenuePieChart;
pub use revenue_bar::{BACK_CONTROL_ID, BACKDROP_CONTROL_ID, RevenueBarChart};
pub use stream::RevenueStreamChart;

use crate::api::{DashboardChart, DashboardConfig};
use crate::core::Viewport;

/// The six charts of the standard layout, in paint order.
#[must_use]
pub fn standard_charts(config: &DashboardConfig) -> Vec<Box<dyn DashboardChart>> {
    vec![
        Box::new(ConflictMapChart::new(
            Viewport::new(825, 550),
            config.map_radius_range,
        )),
        Box::new(
            RevenueBarChart::new(Viewport::new(900, 500))
                .with_share_thresholds(config.donut_min_share_pct, config.donut_label_min_pct)
                .with_legend_max_chars(config.legend_label_max_chars),
        ),
        Box::new(RevenuePieChart::new(
            Viewport::new(430, 300),
            config.permanent_members.clone(),
        )),
        Box::new(ActorChordChart::new(
            Viewport::new(760, 830),
            config.chord_event_limit,
        )),
        Box::new(RevenueStreamChart::new(
            Viewport::new(800, 500),
            config.stream_countries.clone(),
            config.revenue_years,
        )),
        Box::new(ConflictMetricsLineChart::new(Viewport::new(600, 500))),
    ]
}

/// Rounds to a whole number with `,` thousands separators.
#[must_use]
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{format_thousands, standard_charts};
    use crate::api::DashboardConfig;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(0.4), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1234.5), "1,235");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(-4321.0), "-4,321");
    }

    #[test]
    fn standard_layout_has_unique_ids() {
        let charts = standard_charts(&DashboardConfig::default());
        let mut ids: Vec<_> = charts.iter().map(|chart| chart.id().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }
}
