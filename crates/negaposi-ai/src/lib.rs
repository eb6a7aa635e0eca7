//! Inference layer: ONNX Runtime sentence embeddings and the pretrained
//! centroid sentiment model.

mod classifier;
pub use classifier::SentimentClassifier;

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
pub use embedder::Embedder;

#[cfg(feature = "onnx")]
mod service;
#[cfg(feature = "onnx")]
pub use service::VerdictService;
