//! Pretrained sentiment model loaded from the training artifact.
//!
//! The artifact is a JSON file written by the offline training job: one
//! centroid vector per sentiment label, plus the embedding model name and
//! dimension it was trained against. Classification is cosine similarity
//! against each centroid, best match wins.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

/// On-disk layout of the trained artifact.
#[derive(Debug, Deserialize)]
struct Artifact {
    /// Name of the embedding model the centroids were computed with.
    model: String,
    /// Embedding dimensionality.
    dim: usize,
    /// label → centroid vector.
    centroids: BTreeMap<String, Vec<f32>>,
}

/// Centroid-based sentiment classifier.
///
/// Immutable after load; never retrained or reloaded in-process.
pub struct SentimentClassifier {
    model: String,
    dim: usize,
    // BTreeMap keeps label iteration order fixed, so similarity ties
    // resolve to the same label in every process.
    centroids: BTreeMap<String, Vec<f32>>,
}

impl SentimentClassifier {
    /// Load the artifact from disk.
    ///
    /// Fails on a missing file, malformed JSON, an empty label set, or a
    /// centroid whose length disagrees with the declared dimension.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening artifact {}", path.display()))?;
        let artifact: Artifact = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing artifact {}", path.display()))?;

        let classifier = Self::from_artifact(artifact)?;
        info!(
            model = %classifier.model,
            dim = classifier.dim,
            labels = classifier.centroids.len(),
            artifact = %path.display(),
            "loaded sentiment model"
        );
        Ok(classifier)
    }

    fn from_artifact(artifact: Artifact) -> anyhow::Result<Self> {
        anyhow::ensure!(artifact.dim > 0, "artifact declares zero dimension");
        anyhow::ensure!(
            !artifact.centroids.is_empty(),
            "artifact contains no labels"
        );

        let mut centroids = artifact.centroids;
        for (label, centroid) in &mut centroids {
            anyhow::ensure!(
                centroid.len() == artifact.dim,
                "centroid for {label:?} has length {}, expected {}",
                centroid.len(),
                artifact.dim
            );
            // Unit-length centroids make the dot product below a cosine.
            normalize(centroid);
        }

        Ok(Self {
            model: artifact.model,
            dim: artifact.dim,
            centroids,
        })
    }

    /// Name of the embedding model this artifact was trained with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Expected embedding dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Sentiment labels this model can emit.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.centroids.keys().map(|l| l.as_str())
    }

    /// Predict the sentiment label for one embedding.
    ///
    /// Returns the best-matching label with its cosine similarity.
    pub fn predict(&self, embedding: &[f32]) -> anyhow::Result<(&str, f32)> {
        anyhow::ensure!(
            embedding.len() == self.dim,
            "embedding has length {}, expected {}",
            embedding.len(),
            self.dim
        );

        let mut best: Option<(&str, f32)> = None;
        for (label, centroid) in &self.centroids {
            let sim = dot(embedding, centroid);
            if best.is_none_or(|(_, s)| sim > s) {
                best = Some((label, sim));
            }
        }

        // from_artifact rejects empty label sets, so best is always set.
        best.ok_or_else(|| anyhow::anyhow!("no labels loaded"))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// L2-normalize a vector in place.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn artifact(dim: usize, centroids: &[(&str, &[f32])]) -> Artifact {
        Artifact {
            model: "test-encoder".to_string(),
            dim,
            centroids: centroids
                .iter()
                .map(|(l, v)| (l.to_string(), v.to_vec()))
                .collect(),
        }
    }

    fn classifier(centroids: &[(&str, &[f32])]) -> SentimentClassifier {
        SentimentClassifier::from_artifact(artifact(centroids[0].1.len(), centroids)).unwrap()
    }

    #[test]
    fn predicts_nearest_centroid() {
        let clf = classifier(&[
            ("ポジティブ", &[1.0, 0.0, 0.0, 0.0]),
            ("ネガティブ", &[0.0, 1.0, 0.0, 0.0]),
        ]);

        let (label, sim) = clf.predict(&[0.9, 0.1, 0.0, 0.0]).unwrap();
        assert_eq!(label, "ポジティブ");
        assert!(sim > 0.9);

        let (label, _) = clf.predict(&[0.1, 0.9, 0.0, 0.0]).unwrap();
        assert_eq!(label, "ネガティブ");
    }

    #[test]
    fn prediction_is_deterministic() {
        let clf = classifier(&[
            ("ポジティブ", &[1.0, 0.0, 0.0, 0.0]),
            ("ネガティブ", &[0.0, 1.0, 0.0, 0.0]),
        ]);

        let embedding = [0.6, 0.4, 0.0, 0.0];
        let first = clf.predict(&embedding).unwrap();
        let second = clf.predict(&embedding).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_embedding_ties_break_in_label_order() {
        let clf = classifier(&[
            ("ポジティブ", &[1.0, 0.0, 0.0, 0.0]),
            ("ネガティブ", &[0.0, 1.0, 0.0, 0.0]),
        ]);

        // All similarities are 0.0; the first label in BTreeMap order wins.
        // "ネガティブ" sorts before "ポジティブ" by code point.
        let (label, sim) = clf.predict(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(label, "ネガティブ");
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn centroids_are_normalized_on_load() {
        // A long centroid must not win just by magnitude.
        let clf = classifier(&[
            ("ポジティブ", &[100.0, 0.0, 0.0, 0.0]),
            ("ネガティブ", &[0.0, 1.0, 0.0, 0.0]),
        ]);

        let (label, _) = clf.predict(&[0.1, 0.9, 0.0, 0.0]).unwrap();
        assert_eq!(label, "ネガティブ");
    }

    #[test]
    fn rejects_wrong_embedding_length() {
        let clf = classifier(&[("ポジティブ", &[1.0, 0.0, 0.0, 0.0])]);
        assert!(clf.predict(&[1.0, 0.0]).is_err());
    }

    #[test]
    fn rejects_centroid_dim_mismatch() {
        let mut a = artifact(4, &[("ポジティブ", &[1.0, 0.0, 0.0, 0.0])]);
        a.centroids
            .insert("ネガティブ".to_string(), vec![0.0, 1.0]);
        assert!(SentimentClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn rejects_empty_label_set() {
        let a = Artifact {
            model: "test-encoder".to_string(),
            dim: 4,
            centroids: BTreeMap::new(),
        };
        assert!(SentimentClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn loads_artifact_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "model": "sentence-bert-base-ja",
                "dim": 3,
                "centroids": {{
                    "ポジティブ": [1.0, 0.0, 0.0],
                    "ネガティブ": [0.0, 1.0, 0.0]
                }}
            }}"#
        )
        .unwrap();

        let clf = SentimentClassifier::load(file.path()).unwrap();
        assert_eq!(clf.model(), "sentence-bert-base-ja");
        assert_eq!(clf.dim(), 3);
        assert_eq!(clf.labels().count(), 2);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SentimentClassifier::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn load_fails_on_corrupt_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        assert!(SentimentClassifier::load(file.path()).is_err());
    }
}
