use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// One stacked layer: `(lower, upper)` per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedLayer {
    pub key: String,
    pub bands: Vec<(f64, f64)>,
}

/// Stacks `values[layer][column]` around a centered baseline.
///
/// Each column starts at `-total / 2`, which keeps the stream symmetric about
/// zero instead of anchoring the first layer at an absolute baseline.
pub fn stack_silhouette(keys: &[String], values: &[Vec<f64>]) -> DashboardResult<Vec<StackedLayer>> {
    if keys.len() != values.len() {
        return Err(DashboardError::InvalidData(format!(
            "stream stack has {} keys but {} value rows",
            keys.len(),
            values.len()
        )));
    }
    let columns = values.first().map_or(0, Vec::len);
    if values.iter().any(|row| row.len() != columns) {
        return Err(DashboardError::InvalidData(
            "stream stack rows must have equal length".to_owned(),
        ));
    }

    let mut baselines: Vec<f64> = (0..columns)
        .map(|column| {
            let total: f64 = values
                .iter()
                .map(|row| sanitize(row[column]))
                .sum();
            -total / 2.0
        })
        .collect();

    let mut layers = Vec::with_capacity(keys.len());
    for (key, row) in keys.iter().zip(values) {
        let bands = row
            .iter()
            .zip(baselines.iter_mut())
            .map(|(value, baseline)| {
                let lower = *baseline;
                *baseline += sanitize(*value);
                (lower, *baseline)
            })
            .collect();
        layers.push(StackedLayer {
            key: key.clone(),
            bands,
        });
    }
    Ok(layers)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
