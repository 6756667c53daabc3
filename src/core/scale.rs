use crate::error::{DashboardError, DashboardResult};

/// Maps a numeric domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> DashboardResult<Self> {
        let (domain_start, domain_end) = domain;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(DashboardError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        validate_range(range)?;

        Ok(Self {
            domain_start,
            domain_end,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Like `new`, but widens an empty domain `[v, v]` to `[v, v + 1]`.
    pub fn covering(domain: (f64, f64), range: (f64, f64)) -> DashboardResult<Self> {
        let (start, end) = domain;
        if start == end {
            return Self::new((start, end + 1.0), range);
        }
        Self::new(domain, range)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn map(self, value: f64) -> DashboardResult<f64> {
        if !value.is_finite() {
            return Err(DashboardError::InvalidData("value must be finite".to_owned()));
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn invert(self, pixel: f64) -> DashboardResult<f64> {
        if !pixel.is_finite() {
            return Err(DashboardError::InvalidData("pixel must be finite".to_owned()));
        }
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Ok(self.domain_start);
        }
        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Square-root scale from `[0, domain_max]`; used for area-proportional radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain_max: f64,
    range_start: f64,
    range_end: f64,
}

impl SqrtScale {
    pub fn new(domain_max: f64, range: (f64, f64)) -> DashboardResult<Self> {
        if !domain_max.is_finite() || domain_max < 0.0 {
            return Err(DashboardError::InvalidData(
                "sqrt scale domain max must be finite and >= 0".to_owned(),
            ));
        }
        validate_range(range)?;
        Ok(Self {
            domain_max,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Values are clamped into the domain; an empty domain maps to the range start.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        if self.domain_max == 0.0 || !value.is_finite() {
            return self.range_start;
        }
        let normalized = (value.clamp(0.0, self.domain_max) / self.domain_max).sqrt();
        self.range_start + normalized * (self.range_end - self.range_start)
    }
}

/// Discrete bands with inner/outer padding expressed as a fraction of the step.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    range_start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(labels: Vec<String>, range: (f64, f64), padding: f64) -> DashboardResult<Self> {
        validate_range(range)?;
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(DashboardError::InvalidData(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }
        let count = labels.len() as f64;
        let extent = range.1 - range.0;
        let step = if labels.is_empty() {
            0.0
        } else {
            extent / (count - padding + 2.0 * padding)
        };
        Ok(Self {
            labels,
            range_start: range.0 + step * padding,
            step,
            bandwidth: step * (1.0 - padding),
        })
    }

    #[must_use]
    pub fn position(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|candidate| candidate == label)
            .map(|index| self.range_start + self.step * index as f64)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

fn validate_range(range: (f64, f64)) -> DashboardResult<()> {
    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(DashboardError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }
    Ok(())
}
