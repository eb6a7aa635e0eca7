//! The verdict service: owns both loaded models and runs the
//! embed → predict → map pipeline.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing::{debug, info};

use negaposi_core::{Classify, Verdict, VerdictMap};

use crate::{Embedder, SentimentClassifier};

/// Owns the embedding pipeline and the sentiment model.
///
/// Both are loaded exactly once at startup and never reloaded. The ONNX
/// session needs exclusive access per inference call, so the embedder sits
/// behind a mutex; everything else is read-only.
pub struct VerdictService {
    embedder: Mutex<Embedder>,
    classifier: SentimentClassifier,
    verdicts: VerdictMap,
}

impl VerdictService {
    /// Load both models and cross-check their dimensions.
    ///
    /// Any failure here is fatal: the process must not serve requests
    /// with a partially loaded service.
    pub fn load(model_dir: &Path, artifact_path: &Path) -> anyhow::Result<Self> {
        let embedder = Embedder::load(model_dir).context("loading embedding model")?;
        let classifier = SentimentClassifier::load(artifact_path).context("loading sentiment model")?;

        anyhow::ensure!(
            embedder.dim() == classifier.dim(),
            "embedding model produces {}-dim vectors but artifact was trained on {}-dim",
            embedder.dim(),
            classifier.dim()
        );

        info!(
            model = %classifier.model(),
            dim = classifier.dim(),
            "verdict service ready"
        );

        Ok(Self {
            embedder: Mutex::new(embedder),
            classifier,
            verdicts: VerdictMap::default(),
        })
    }

    /// Name of the embedding model the artifact was trained with.
    pub fn model(&self) -> &str {
        self.classifier.model()
    }

    /// Embedding dimensionality.
    pub fn dim(&self) -> usize {
        self.classifier.dim()
    }
}

impl Classify for VerdictService {
    fn classify(&self, text: &str) -> anyhow::Result<Verdict> {
        let embedding = {
            let mut embedder = self
                .embedder
                .lock()
                .map_err(|_| anyhow::anyhow!("embedder lock poisoned"))?;
            embedder.embed(text)?
        };

        let (label, similarity) = self.classifier.predict(&embedding)?;
        let verdict = self.verdicts.map(label);
        debug!(label, similarity, verdict = verdict.as_str(), "classified text");
        Ok(verdict)
    }
}
