//! Provider payload shapes and static band documents.

use cloud_common::{BoundingBox, CloudResult};
use serde_json::Value;

use crate::{CloudMatrix, GridNormalizer};

/// A band document as loaded from disk or the proxy.
///
/// Static band files are either a provider payload or an already
/// normalized nested matrix (`[[null, 3, ...], ...]`).
#[derive(Debug, Clone, PartialEq)]
pub enum CloudSource {
    Payload(Value),
    Matrix(CloudMatrix),
}

impl CloudSource {
    /// Parse a band document. Only invalid JSON is an error; an unexpected
    /// shape is kept as a payload and normalizes to an all-absent matrix.
    pub fn from_json(text: &str) -> CloudResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(rows) => CloudSource::Matrix(matrix_from_json_rows(&rows)),
            other => CloudSource::Payload(other),
        }
    }

    /// Resolve to a matrix on the given grid.
    pub fn into_matrix(self, bbox: &BoundingBox) -> CloudMatrix {
        match self {
            CloudSource::Matrix(matrix) => matrix,
            CloudSource::Payload(payload) => GridNormalizer::new(bbox).normalize(&payload),
        }
    }
}

fn matrix_from_json_rows(rows: &[Value]) -> CloudMatrix {
    let rows = rows
        .iter()
        .map(|row| match row {
            Value::Array(cells) => cells.iter().map(Value::as_f64).collect(),
            _ => Vec::new(),
        })
        .collect();
    CloudMatrix::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_document() {
        let source = CloudSource::from_json("[[null, 3], [8, null]]").unwrap();
        let matrix = source.into_matrix(&BoundingBox::default());
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix.get(0, 1), Some(3.0));
        assert_eq!(matrix.get(1, 0), Some(8.0));
        assert_eq!(matrix.get(0, 0), None);
    }

    #[test]
    fn test_payload_document() {
        let source = CloudSource::from_json(r#"{"data": []}"#).unwrap();
        assert!(matches!(source, CloudSource::Payload(_)));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(CloudSource::from_json("{not json").is_err());
    }
}
