use serde::{Deserialize, Serialize};

use crate::api::TransitionTiming;
use crate::core::YearRange;
use crate::data::DataPaths;
use crate::error::{DashboardError, DashboardResult};

/// Dashboard bootstrap configuration.
///
/// Every field has a default so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_initial_year")]
    pub initial_year: i32,
    /// Year domain used until datasets are loaded.
    #[serde(default = "default_fallback_year_range")]
    pub fallback_year_range: YearRange,
    #[serde(default = "default_revenue_years")]
    pub revenue_years: YearRange,
    #[serde(default)]
    pub data_paths: DataPaths,
    #[serde(default)]
    pub transitions: TransitionTiming,
    /// Only this many filtered events feed the chord diagram.
    #[serde(default = "default_chord_event_limit")]
    pub chord_event_limit: usize,
    #[serde(default = "default_donut_min_share_pct")]
    pub donut_min_share_pct: f64,
    #[serde(default = "default_donut_label_min_pct")]
    pub donut_label_min_pct: f64,
    #[serde(default = "default_legend_label_max_chars")]
    pub legend_label_max_chars: usize,
    #[serde(default = "default_map_radius_range")]
    pub map_radius_range: (f64, f64),
    #[serde(default = "default_stream_countries")]
    pub stream_countries: Vec<String>,
    #[serde(default = "default_permanent_members")]
    pub permanent_members: Vec<String>,
    #[serde(default = "default_gdp_year_window")]
    pub gdp_year_window: YearRange,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_year: default_initial_year(),
            fallback_year_range: default_fallback_year_range(),
            revenue_years: default_revenue_years(),
            data_paths: DataPaths::default(),
            transitions: TransitionTiming::default(),
            chord_event_limit: default_chord_event_limit(),
            donut_min_share_pct: default_donut_min_share_pct(),
            donut_label_min_pct: default_donut_label_min_pct(),
            legend_label_max_chars: default_legend_label_max_chars(),
            map_radius_range: default_map_radius_range(),
            stream_countries: default_stream_countries(),
            permanent_members: default_permanent_members(),
            gdp_year_window: default_gdp_year_window(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> DashboardResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| DashboardError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::InvalidData(format!("failed to serialize config: {e}")))
    }

    #[must_use]
    pub fn with_data_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.data_paths.root = root.into();
        self
    }

    #[must_use]
    pub fn with_revenue_years(mut self, years: YearRange) -> Self {
        self.revenue_years = years;
        self
    }

    #[must_use]
    pub fn with_transitions(mut self, transitions: TransitionTiming) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn validate(&self) -> DashboardResult<()> {
        for (name, range) in [
            ("fallback_year_range", self.fallback_year_range),
            ("revenue_years", self.revenue_years),
            ("gdp_year_window", self.gdp_year_window),
        ] {
            if range.start > range.end {
                return Err(DashboardError::InvalidData(format!(
                    "{name} start must be <= end"
                )));
            }
        }
        if !self.fallback_year_range.contains(self.initial_year) {
            return Err(DashboardError::InvalidData(format!(
                "initial_year {} must lie inside fallback_year_range",
                self.initial_year
            )));
        }
        if !self.transitions.is_valid() {
            return Err(DashboardError::InvalidData(
                "transition durations must be finite and >= 0".to_owned(),
            ));
        }
        if self.chord_event_limit == 0 {
            return Err(DashboardError::InvalidData(
                "chord_event_limit must be > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("donut_min_share_pct", self.donut_min_share_pct),
            ("donut_label_min_pct", self.donut_label_min_pct),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(DashboardError::InvalidData(format!(
                    "{name} must be a percentage in [0, 100]"
                )));
            }
        }
        if self.legend_label_max_chars < 2 {
            return Err(DashboardError::InvalidData(
                "legend_label_max_chars must be >= 2".to_owned(),
            ));
        }
        let (min_radius, max_radius) = self.map_radius_range;
        if !min_radius.is_finite()
            || !max_radius.is_finite()
            || min_radius < 0.0
            || max_radius < min_radius
        {
            return Err(DashboardError::InvalidData(
                "map_radius_range must satisfy 0 <= min <= max".to_owned(),
            ));
        }
        Ok(())
    }

    /// Configured revenue years, ascending.
    #[must_use]
    pub fn revenue_year_list(&self) -> Vec<i32> {
        self.revenue_years.years().collect()
    }
}

fn default_initial_year() -> i32 {
    2015
}

fn default_fallback_year_range() -> YearRange {
    YearRange {
        start: 2015,
        end: 2024,
    }
}

fn default_revenue_years() -> YearRange {
    YearRange {
        start: 2015,
        end: 2024,
    }
}

fn default_chord_event_limit() -> usize {
    400
}

fn default_donut_min_share_pct() -> f64 {
    1.0
}

fn default_donut_label_min_pct() -> f64 {
    3.0
}

fn default_legend_label_max_chars() -> usize {
    25
}

fn default_map_radius_range() -> (f64, f64) {
    (3.0, 15.0)
}

fn default_stream_countries() -> Vec<String> {
    [
        "United States",
        "China",
        "Japan",
        "United Kingdom",
        "Netherlands",
        "France",
        "Italy",
        "Russia",
        "Israel",
        "Germany",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

fn default_permanent_members() -> Vec<String> {
    ["China", "France", "Russia", "United Kingdom", "United States"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_gdp_year_window() -> YearRange {
    YearRange {
        start: 2010,
        end: 2024,
    }
}
