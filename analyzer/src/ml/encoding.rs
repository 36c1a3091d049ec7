//! Categorical label encoding

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Bidirectional string-to-code mapping for one categorical column
///
/// Codes are contiguous and assigned in first-seen order during [`fit`].
/// A codec instance belongs to exactly one column: the codes it hands out
/// are only meaningful relative to the values that produced them, so the
/// nutrient flags and the irrigation state never share an instance.
///
/// The same codec that encoded the training labels must decode the model's
/// predictions; it is serialized into the model artifact for that reason.
///
/// [`fit`]: LabelCodec::fit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    labels: Vec<String>,
}

impl LabelCodec {
    /// Build a codec over every distinct label in `values`, keeping
    /// first-seen order
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut labels: Vec<String> = Vec::new();
        for value in values {
            if !labels.iter().any(|known| known == value) {
                labels.push(value.to_string());
            }
        }
        Self { labels }
    }

    /// Code for a fitted label
    pub fn encode(&self, label: &str) -> AppResult<u32> {
        self.labels
            .iter()
            .position(|known| known == label)
            .map(|index| index as u32)
            .ok_or_else(|| AppError::UnknownLabel(label.to_string()))
    }

    /// Label for a fitted code
    pub fn decode(&self, code: u32) -> AppResult<&str> {
        self.labels
            .get(code as usize)
            .map(String::as_str)
            .ok_or(AppError::UnknownCode(code))
    }

    /// Number of distinct labels seen during fit
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Fitted labels in code order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_first_seen_order() {
        let codec = LabelCodec::fit(["ligada", "desligada", "ligada", "manual"]);
        assert_eq!(codec.len(), 3);
        assert_eq!(codec.encode("ligada").unwrap(), 0);
        assert_eq!(codec.encode("desligada").unwrap(), 1);
        assert_eq!(codec.encode("manual").unwrap(), 2);
    }

    #[test]
    fn test_round_trip_for_every_fitted_label() {
        let codec = LabelCodec::fit(["desligada", "ligada"]);
        for label in codec.labels().to_vec() {
            let code = codec.encode(&label).unwrap();
            assert_eq!(codec.decode(code).unwrap(), label);
        }
    }

    #[test]
    fn test_unknown_label_fails() {
        let codec = LabelCodec::fit(["ligada"]);
        assert!(matches!(
            codec.encode("desligada"),
            Err(AppError::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_unknown_code_fails() {
        let codec = LabelCodec::fit(["ligada"]);
        assert!(matches!(codec.decode(5), Err(AppError::UnknownCode(5))));
    }

    #[test]
    fn test_empty_codec() {
        let codec = LabelCodec::default();
        assert!(codec.is_empty());
        assert!(codec.encode("ligada").is_err());
    }
}
