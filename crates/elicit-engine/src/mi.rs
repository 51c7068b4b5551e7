//! Pairwise mutual-information scores between symptoms.

use std::collections::HashMap;

use elicit_core::SymptomId;

use crate::error::EngineError;

/// Square symptom x symptom table, stored row-major.
///
/// Rows and columns share one vocabulary; `ids()` gives its order, which is
/// also the order the selector walks candidates in.
#[derive(Debug, Clone)]
pub struct MutualInformationMatrix {
    ids: Vec<SymptomId>,
    positions: HashMap<SymptomId, usize>,
    values: Vec<f64>,
}

impl MutualInformationMatrix {
    /// Build from a row-major table whose rows and columns are both `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ArtifactMismatch`] for an empty vocabulary,
    /// duplicate ids, a ragged table or a non-finite entry.
    pub fn new(ids: Vec<SymptomId>, rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        Self::with_columns(ids.clone(), ids, rows)
    }

    /// Build from a table whose columns may be ordered differently from its rows.
    ///
    /// Columns are re-ordered to match the rows; both headers must name the
    /// same set of symptoms.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`], plus a mismatch between row and column ids.
    pub fn with_columns(
        row_ids: Vec<SymptomId>,
        column_ids: Vec<SymptomId>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, EngineError> {
        if row_ids.is_empty() {
            return Err(mismatch("mutual-information matrix is empty"));
        }
        if rows.len() != row_ids.len() {
            return Err(mismatch(format!(
                "mutual-information matrix has {} row ids but {} rows",
                row_ids.len(),
                rows.len()
            )));
        }
        if column_ids.len() != row_ids.len() {
            return Err(mismatch(format!(
                "mutual-information matrix is not square: {} rows, {} columns",
                row_ids.len(),
                column_ids.len()
            )));
        }

        let positions = index_ids(&row_ids, "row")?;
        let column_positions = index_ids(&column_ids, "column")?;
        // Source column index for each row-ordered column.
        let mut source_column = Vec::with_capacity(row_ids.len());
        for id in &row_ids {
            let Some(&column) = column_positions.get(id) else {
                return Err(mismatch(format!(
                    "'{id}' has a row but no column in the mutual-information matrix"
                )));
            };
            source_column.push(column);
        }

        let n = row_ids.len();
        let mut values = Vec::with_capacity(n * n);
        for (id, row) in row_ids.iter().zip(&rows) {
            if row.len() != n {
                return Err(mismatch(format!(
                    "row '{id}' has {} values, expected {n}",
                    row.len()
                )));
            }
            for &column in &source_column {
                let value = row[column];
                if !value.is_finite() {
                    return Err(mismatch(format!(
                        "non-finite mutual information in row '{id}'"
                    )));
                }
                values.push(value);
            }
        }

        Ok(Self {
            ids: row_ids,
            positions,
            values,
        })
    }

    /// Score for `(row, column)`, or `None` if either id is unknown.
    #[must_use]
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let row = *self.positions.get(row)?;
        let column = *self.positions.get(column)?;
        Some(self.values[row * self.ids.len() + column])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[SymptomId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn mismatch(message: impl Into<String>) -> EngineError {
    EngineError::ArtifactMismatch(message.into())
}

fn index_ids(ids: &[SymptomId], axis: &str) -> Result<HashMap<SymptomId, usize>, EngineError> {
    let mut positions = HashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        if positions.insert(id.clone(), position).is_some() {
            return Err(mismatch(format!(
                "duplicate {axis} id '{id}' in mutual-information matrix"
            )));
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(names: &[&str]) -> Vec<SymptomId> {
        names.iter().copied().map(SymptomId::from).collect()
    }

    #[test]
    fn lookups_by_row_and_column() {
        let matrix = MutualInformationMatrix::new(
            ids(&["a", "b"]),
            vec![vec![0.0, 0.3], vec![0.4, 0.0]],
        )
        .unwrap();

        assert_eq!(matrix.get("a", "b"), Some(0.3));
        assert_eq!(matrix.get("b", "a"), Some(0.4));
        assert_eq!(matrix.get("a", "a"), Some(0.0));
        assert_eq!(matrix.get("a", "zzz"), None);
    }

    #[test]
    fn reorders_columns_to_match_rows() {
        let matrix = MutualInformationMatrix::with_columns(
            ids(&["a", "b", "c"]),
            ids(&["c", "a", "b"]),
            vec![
                vec![0.13, 0.0, 0.12],
                vec![0.23, 0.21, 0.0],
                vec![0.0, 0.31, 0.32],
            ],
        )
        .unwrap();

        assert_eq!(matrix.get("a", "b"), Some(0.12));
        assert_eq!(matrix.get("a", "c"), Some(0.13));
        assert_eq!(matrix.get("b", "a"), Some(0.21));
        assert_eq!(matrix.get("c", "b"), Some(0.32));
        assert_eq!(matrix.ids(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = MutualInformationMatrix::new(ids(&["a", "b"]), vec![vec![0.0, 0.1], vec![0.2]])
            .unwrap_err();
        assert!(err.to_string().contains("row 'b' has 1 values"));
    }

    #[test]
    fn rejects_column_vocabulary_mismatch() {
        let err = MutualInformationMatrix::with_columns(
            ids(&["a", "b"]),
            ids(&["a", "x"]),
            vec![vec![0.0, 0.1], vec![0.2, 0.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("'b' has a row but no column"));
    }

    #[test]
    fn rejects_nan() {
        let err = MutualInformationMatrix::new(ids(&["a"]), vec![vec![f64::NAN]]).unwrap_err();
        assert!(matches!(err, EngineError::ArtifactMismatch(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = MutualInformationMatrix::new(
            ids(&["a", "a"]),
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate row id 'a'"));
    }
}
