//! Row sampling and column downcasting for datasets too large to plot.
//!
//! Both operations build a new dataset; the input is never modified.

use crate::constants::DEFAULT_CATEGORICAL_RATIO;
use crate::types::{Column, ColumnData, TabularDataset};
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct OptimizerConfig {
    /// Text columns whose distinct/non-null ratio is at or below this become categorical
    pub categorical_ratio: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            categorical_ratio: DEFAULT_CATEGORICAL_RATIO,
        }
    }
}

/// Deterministic sampling and lossless type narrowing
pub struct DataOptimizer;

impl DataOptimizer {
    /// Reduce a dataset to at most `max_points` rows by uniform stride.
    ///
    /// The first and last rows are always kept when `max_points >= 2`.
    /// Datasets already within budget come back unchanged.
    pub fn sample_large_dataset(dataset: &TabularDataset, max_points: usize) -> TabularDataset {
        if dataset.len() <= max_points {
            return dataset.clone();
        }

        let indices = Self::sample_indices(dataset.len(), max_points);
        debug!(
            rows = dataset.len(),
            sampled = indices.len(),
            "Sampled dataset"
        );
        dataset.take_rows(&indices)
    }

    /// Row indices kept when sampling `len` rows down to `max_points`
    pub fn sample_indices(len: usize, max_points: usize) -> Vec<usize> {
        match max_points {
            _ if len <= max_points => (0..len).collect(),
            0 => Vec::new(),
            1 => vec![0],
            m => {
                let span = (len - 1) as u128;
                let steps = (m - 1) as u128;
                (0..m as u128)
                    .map(|k| (k * span / steps) as usize)
                    .collect()
            }
        }
    }

    /// Narrow every column with the default categorical ratio
    pub fn optimize_data_types(dataset: &TabularDataset) -> TabularDataset {
        Self::optimize_data_types_with(dataset, &OptimizerConfig::default())
    }

    /// Narrow numeric columns and dictionary-encode low-cardinality text.
    ///
    /// Every decoded value is preserved exactly; row count and column order
    /// never change.
    pub fn optimize_data_types_with(
        dataset: &TabularDataset,
        config: &OptimizerConfig,
    ) -> TabularDataset {
        let before = dataset.memory_usage();

        let columns: Vec<Column> = dataset
            .columns()
            .iter()
            .map(|c| match narrow(c.data(), config) {
                Some(data) => {
                    debug!(
                        column = c.name(),
                        from = c.data().representation(),
                        to = data.representation(),
                        "Narrowed column"
                    );
                    c.with_data(data)
                }
                None => c.clone(),
            })
            .collect();

        let optimized = TabularDataset::from_parts(columns, dataset.len());
        debug!(
            before_bytes = before,
            after_bytes = optimized.memory_usage(),
            "Optimized data types"
        );
        optimized
    }
}

/// A narrower representation, or `None` when the column is already minimal
fn narrow(data: &ColumnData, config: &OptimizerConfig) -> Option<ColumnData> {
    let narrowed = match data {
        ColumnData::Int16(v) => narrow_ints(v.iter().map(|x| x.map(i64::from)).collect()),
        ColumnData::Int32(v) => narrow_ints(v.iter().map(|x| x.map(i64::from)).collect()),
        ColumnData::Int64(v) => narrow_ints(v.clone()),
        ColumnData::Float64(v) => {
            let exact = v
                .iter()
                .flatten()
                .all(|x| x.is_nan() || (*x as f32) as f64 == *x);
            exact.then(|| ColumnData::Float32(v.iter().map(|x| x.map(|f| f as f32)).collect()))?
        }
        ColumnData::Text(v) => categorize(v, config.categorical_ratio)?,
        _ => return None,
    };

    (narrowed.representation() != data.representation()).then_some(narrowed)
}

fn narrow_ints(values: Vec<Option<i64>>) -> ColumnData {
    let (min, max) = values
        .iter()
        .flatten()
        .fold((0i64, 0i64), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let fits = |lo: i64, hi: i64| min >= lo && max <= hi;

    if fits(i8::MIN.into(), i8::MAX.into()) {
        ColumnData::Int8(values.iter().map(|x| x.map(|v| v as i8)).collect())
    } else if fits(i16::MIN.into(), i16::MAX.into()) {
        ColumnData::Int16(values.iter().map(|x| x.map(|v| v as i16)).collect())
    } else if fits(i32::MIN.into(), i32::MAX.into()) {
        ColumnData::Int32(values.iter().map(|x| x.map(|v| v as i32)).collect())
    } else {
        ColumnData::Int64(values)
    }
}

/// Dictionary-encode text whose distinct/non-null ratio is at or below `ratio`.
/// Categories keep first-appearance order.
fn categorize(values: &[Option<String>], ratio: f64) -> Option<ColumnData> {
    let present = values.iter().flatten().count();
    if present == 0 {
        return None;
    }

    let mut categories: Vec<String> = Vec::new();
    let mut lookup: HashMap<&str, u32> = HashMap::new();
    let mut codes = Vec::with_capacity(values.len());
    for value in values {
        let code = value.as_deref().map(|s| {
            *lookup.entry(s).or_insert_with(|| {
                categories.push(s.to_string());
                (categories.len() - 1) as u32
            })
        });
        codes.push(code);
    }

    if categories.len() as f64 / present as f64 > ratio {
        return None;
    }
    Some(ColumnData::Categorical { categories, codes })
}
