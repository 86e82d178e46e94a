//! Missing value imputation

use crate::error::{Result, WorkbenchError};
use polars::prelude::*;
use tracing::debug;

/// Whether a column dtype holds plain numbers that can be imputed and scaled
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Replace missing entries (null or NaN) of every numeric column with the
/// column mean of the same frame. Numeric columns come back as `Float64`;
/// every other column is left untouched.
pub fn fill_missing_with_mean(df: &DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }

    let numeric: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();

    // Build every replacement first, then apply them in one pass
    let replacements: Vec<Series> = numeric
        .iter()
        .map(|name| {
            let column = df
                .column(name)
                .map_err(|_| WorkbenchError::ColumnNotFound(name.clone()))?;
            fill_series(column.as_materialized_series())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut result = df.clone();
    for filled in replacements {
        result.with_column(filled)?;
    }

    Ok(result)
}

fn fill_series(series: &Series) -> Result<Series> {
    let name = series.name().clone();
    let as_float = series.cast(&DataType::Float64)?;
    let ca = as_float.f64()?;

    let (sum, count) = ca
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));

    if count == 0 {
        return Err(WorkbenchError::AllValuesMissing(name.to_string()));
    }

    let mean = sum / count as f64;
    let missing = ca.len() - count;
    if missing > 0 {
        debug!(column = %name, missing, mean, "Filling missing values with column mean");
    }

    let filled: Float64Chunked = ca
        .into_iter()
        .map(|opt| match opt {
            Some(v) if !v.is_nan() => Some(v),
            _ => Some(mean),
        })
        .collect();

    Ok(filled.with_name(name).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_nulls_with_mean() {
        let df = df!(
            "a" => &[Some(1.0), None, Some(3.0)],
            "b" => &[Some(10i64), Some(20), None]
        )
        .unwrap();

        let cleaned = fill_missing_with_mean(&df).unwrap();

        let a: Vec<f64> = cleaned.column("a").unwrap().as_materialized_series().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(a, vec![1.0, 2.0, 3.0]);

        let b: Vec<f64> = cleaned.column("b").unwrap().as_materialized_series().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(b, vec![10.0, 20.0, 15.0]);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df!("a" => &[2.0, f64::NAN, 4.0]).unwrap();
        let cleaned = fill_missing_with_mean(&df).unwrap();
        let a: Vec<f64> = cleaned.column("a").unwrap().as_materialized_series().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(a, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_string_columns_pass_through() {
        let df = df!(
            "name" => &[Some("x"), None, Some("z")],
            "v" => &[Some(1.0), Some(2.0), None]
        )
        .unwrap();

        let cleaned = fill_missing_with_mean(&df).unwrap();
        assert_eq!(cleaned.column("name").unwrap().null_count(), 1);
        assert_eq!(cleaned.column("v").unwrap().null_count(), 0);
    }

    #[test]
    fn test_all_missing_column_fails() {
        let df = df!(
            "ok" => &[1.0, 2.0],
            "empty" => &[None::<f64>, None]
        )
        .unwrap();

        let err = fill_missing_with_mean(&df).unwrap_err();
        assert!(matches!(err, WorkbenchError::AllValuesMissing(ref c) if c == "empty"));
    }
}
