//! Request/response types and input validation.

use serde::Serialize;
use service_core::error::AppError;
use thiserror::Error;

/// Side length of the square input image.
pub const IMAGE_SIDE: usize = 28;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub result: usize,
}

/// Request-scoped failures, split into client errors (missing field, wrong
/// shape) and computation errors (unreadable body, bad entries, inference).
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("No 'image' key in the request")]
    MissingImage,
    #[error("Input shape is not (28, 28)")]
    BadShape,
    #[error("{0}")]
    Payload(String),
    #[error("Image entry at row {row}, column {col} is not a number")]
    NonNumeric { row: usize, col: usize },
    #[error("Inference failed: {0}")]
    Inference(#[source] anyhow::Error),
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::MissingImage | PredictError::BadShape => {
                AppError::BadRequest(anyhow::Error::new(err))
            }
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}

/// A validated 28×28 grayscale image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGrid(Vec<f32>);

impl ImageGrid {
    /// Check the payload against the expected shape, then convert entries.
    ///
    /// Wrong row count, wrong column count, ragged rows, and rows that are
    /// not arrays are all shape violations. A non-numeric entry inside a
    /// well-shaped grid is a computation error.
    pub fn parse(value: &serde_json::Value) -> Result<Self, PredictError> {
        let rows = value.as_array().ok_or(PredictError::BadShape)?;
        if rows.len() != IMAGE_SIDE {
            return Err(PredictError::BadShape);
        }

        let mut pixels = Vec::with_capacity(IMAGE_SIDE * IMAGE_SIDE);
        for (row_idx, row) in rows.iter().enumerate() {
            let cols = row.as_array().ok_or(PredictError::BadShape)?;
            if cols.len() != IMAGE_SIDE {
                return Err(PredictError::BadShape);
            }
            for (col_idx, entry) in cols.iter().enumerate() {
                let value = entry.as_f64().ok_or(PredictError::NonNumeric {
                    row: row_idx,
                    col: col_idx,
                })?;
                pixels.push(value as f32);
            }
        }

        Ok(Self(pixels))
    }

    /// Row-major pixel data, `IMAGE_SIDE * IMAGE_SIDE` entries.
    pub fn pixels(&self) -> &[f32] {
        &self.0
    }
}
