use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Length of the seed window fed to the model: the last 60 trading days.
pub const SEQ_WINDOW: usize = 60;

/// Anything that can turn a window of normalized closes into the next
/// normalized close. The forecast loop only sees this seam, so tests can
/// drive it with stubs.
pub trait Predictor: Send + Sync {
    fn predict(&self, window: &[f64]) -> f64;
}

/// Min-max scaler fit on a full close series, mapping it into [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// None when the series is empty or flat; a degenerate range cannot be
    /// inverted.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if !min.is_finite() || !max.is_finite() || (max - min).abs() < 1e-12 {
            return None;
        }

        Some(Self { min, max })
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("model file malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("model dimensions inconsistent: {0}")]
    BadShape(String),
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    window: usize,
    hidden_size: usize,
    /// hidden_size rows, each a single input weight
    w_ih: Vec<f64>,
    /// hidden_size x hidden_size, row-major
    w_hh: Vec<f64>,
    b_h: Vec<f64>,
    w_out: Vec<f64>,
    b_out: f64,
}

/// Pre-trained single-feature recurrent model, deserialized from a JSON
/// artifact produced by the offline training job. Inference only: the
/// window is consumed one scalar at a time through a tanh recurrence and the
/// final hidden state maps linearly to the next normalized close.
pub struct SequenceModel {
    w_ih: Array1<f64>,
    w_hh: Array2<f64>,
    b_h: Array1<f64>,
    w_out: Array1<f64>,
    b_out: f64,
}

impl SequenceModel {
    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let raw = std::fs::read_to_string(path)?;
        let file: ModelFile = serde_json::from_str(&raw)?;

        if file.window != SEQ_WINDOW {
            return Err(ModelLoadError::BadShape(format!(
                "expected window {SEQ_WINDOW}, artifact has {}",
                file.window
            )));
        }

        let h = file.hidden_size;
        if file.w_ih.len() != h
            || file.w_hh.len() != h * h
            || file.b_h.len() != h
            || file.w_out.len() != h
        {
            return Err(ModelLoadError::BadShape(format!(
                "weight lengths do not match hidden size {h}"
            )));
        }

        let w_hh = Array2::from_shape_vec((h, h), file.w_hh)
            .map_err(|e| ModelLoadError::BadShape(e.to_string()))?;

        Ok(Self {
            w_ih: Array1::from(file.w_ih),
            w_hh,
            b_h: Array1::from(file.b_h),
            w_out: Array1::from(file.w_out),
            b_out: file.b_out,
        })
    }

    /// Try to load the artifact from the configured path. Absence or a
    /// malformed file is a normal condition that routes forecasting to the
    /// statistical fallback, so this never fails the caller.
    pub fn try_load(path: &str) -> Option<Self> {
        let path = Path::new(path);
        if !path.exists() {
            warn!("Forecast model not found at {}; using fallback strategy", path.display());
            return None;
        }

        match Self::from_file(path) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("Failed to load forecast model: {}; using fallback strategy", e);
                None
            }
        }
    }
}

impl Predictor for SequenceModel {
    fn predict(&self, window: &[f64]) -> f64 {
        let hidden_size = self.b_h.len();
        let mut h = Array1::<f64>::zeros(hidden_size);

        for &x in window {
            let pre = &self.w_ih * x + self.w_hh.dot(&h) + &self.b_h;
            h = pre.mapv(f64::tanh);
        }

        self.w_out.dot(&h) + self.b_out
    }
}
