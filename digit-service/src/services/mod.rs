pub mod classifier;

pub use classifier::{Classifier, OnnxClassifier, argmax};
