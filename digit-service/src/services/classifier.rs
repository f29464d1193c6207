//! Model loading and forward inference.
//!
//! The model artifact is opaque to this service: it is loaded once at
//! startup and invoked per request, nothing more.

use crate::models::{IMAGE_SIDE, ImageGrid};
use anyhow::Context;
use std::path::Path;
use tract_onnx::prelude::*;

/// A loaded classifier: maps a validated image to per-class scores.
///
/// Implementations must be safe to share across request tasks; the model is
/// never mutated after load.
pub trait Classifier: Send + Sync {
    fn scores(&self, image: &ImageGrid) -> anyhow::Result<Vec<f32>>;
}

/// ONNX-backed classifier running on tract.
pub struct OnnxClassifier {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
}

impl OnnxClassifier {
    /// Load and optimize the model artifact. Called once at startup; any
    /// failure here is fatal to the process.
    pub fn load<P: AsRef<Path>>(model_path: P) -> anyhow::Result<Self> {
        let path = model_path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .with_context(|| format!("reading model artifact {}", path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, IMAGE_SIDE, IMAGE_SIDE)),
            )?
            .into_optimized()?
            .into_runnable()?;

        tracing::info!(
            inputs = plan.model().inputs.len(),
            outputs = plan.model().outputs.len(),
            "Model plan ready"
        );

        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn scores(&self, image: &ImageGrid) -> anyhow::Result<Vec<f32>> {
        // Single-item batch of shape (1, 28, 28).
        let input = Tensor::from_shape(&[1, IMAGE_SIDE, IMAGE_SIDE], image.pixels())?;
        let outputs = self.plan.run(tvec!(input.into()))?;
        let scores = outputs[0].to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

/// Index of the maximum score; ties resolve to the lowest index.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, top)) => score > top,
        };
        if better {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.9, 0.1]), Some(0));
    }

    #[test]
    fn test_argmax_ties_resolve_to_lowest_index() {
        assert_eq!(argmax(&[0.3, 0.5, 0.5, 0.1]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
    }

    #[test]
    fn test_argmax_of_empty_slice_is_none() {
        assert_eq!(argmax(&[]), None);
    }
}
