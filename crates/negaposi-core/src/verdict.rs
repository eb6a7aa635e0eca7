//! The binary verdict and the sentiment-label → verdict table.
//!
//! Callers see the verdict on the wire as a bare JSON string: `"合格"`
//! (pass) or `"不合格"` (fail).

use serde::{Deserialize, Serialize};

/// Label the sentiment model emits for positive text.
pub const LABEL_POSITIVE: &str = "ポジティブ";
/// Label the sentiment model emits for negative text.
pub const LABEL_NEGATIVE: &str = "ネガティブ";

/// Binary outcome of classifying one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "合格")]
    Pass,
    #[serde(rename = "不合格")]
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "合格",
            Self::Fail => "不合格",
        }
    }
}

/// Enumerated sentiment-label → verdict table with an explicit default arm.
///
/// Labels the table does not list map to the fallback verdict and leave a
/// warn-level audit record, so a new or misspelled model label can never
/// fail candidates silently.
#[derive(Debug, Clone)]
pub struct VerdictMap {
    entries: Vec<(String, Verdict)>,
    fallback: Verdict,
}

impl Default for VerdictMap {
    fn default() -> Self {
        Self {
            entries: vec![
                (LABEL_POSITIVE.to_string(), Verdict::Pass),
                (LABEL_NEGATIVE.to_string(), Verdict::Fail),
            ],
            fallback: Verdict::Fail,
        }
    }
}

impl VerdictMap {
    /// Map a sentiment label to its verdict.
    pub fn map(&self, label: &str) -> Verdict {
        match self.entries.iter().find(|(l, _)| l == label) {
            Some((_, verdict)) => *verdict,
            None => {
                tracing::warn!(label, "unmapped sentiment label, using fallback verdict");
                self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_label_maps_to_pass() {
        let map = VerdictMap::default();
        assert_eq!(map.map(LABEL_POSITIVE), Verdict::Pass);
    }

    #[test]
    fn negative_label_maps_to_fail() {
        let map = VerdictMap::default();
        assert_eq!(map.map(LABEL_NEGATIVE), Verdict::Fail);
    }

    #[test]
    fn unknown_label_falls_back_to_fail() {
        let map = VerdictMap::default();
        assert_eq!(map.map("ニュートラル"), Verdict::Fail);
        assert_eq!(map.map(""), Verdict::Fail);
    }

    #[test]
    fn serializes_to_wire_literals() {
        assert_eq!(serde_json::to_string(&Verdict::Pass).unwrap(), "\"合格\"");
        assert_eq!(serde_json::to_string(&Verdict::Fail).unwrap(), "\"不合格\"");
    }

    #[test]
    fn deserializes_from_wire_literals() {
        let v: Verdict = serde_json::from_str("\"合格\"").unwrap();
        assert_eq!(v, Verdict::Pass);
        let v: Verdict = serde_json::from_str("\"不合格\"").unwrap();
        assert_eq!(v, Verdict::Fail);
    }

    #[test]
    fn as_str_matches_serde_rename() {
        for v in [Verdict::Pass, Verdict::Fail] {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v.as_str()));
        }
    }
}
