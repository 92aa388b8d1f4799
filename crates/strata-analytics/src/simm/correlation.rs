//! Labelled tenor correlation matrices.

use nalgebra::DMatrix;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Symmetric correlation between tenor labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TenorCorrelation {
    labels: Vec<String>,
    matrix: DMatrix<f64>,
}

impl TenorCorrelation {
    /// Wraps `matrix`, whose rows and columns follow `labels`.
    ///
    /// The matrix must be square, symmetric, with entries in `[-1, 1]` and a
    /// unit diagonal. Labels must be unique.
    pub fn new(labels: Vec<String>, matrix: DMatrix<f64>) -> AnalyticsResult<Self> {
        let n = labels.len();
        if matrix.nrows() != n || matrix.ncols() != n {
            return Err(AnalyticsError::invalid_input(format!(
                "correlation matrix is {}x{} for {n} tenors",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(AnalyticsError::invalid_input(format!("tenor {label} appears twice")));
            }
        }
        for i in 0..n {
            if (matrix[(i, i)] - 1.0).abs() > 1e-12 {
                return Err(AnalyticsError::invalid_input(format!("diagonal at {} is not 1", labels[i])));
            }
            for j in 0..i {
                let rho = matrix[(i, j)];
                if !(-1.0..=1.0).contains(&rho) || (rho - matrix[(j, i)]).abs() > 1e-12 {
                    return Err(AnalyticsError::invalid_input(format!(
                        "correlation between {} and {} is invalid",
                        labels[i], labels[j]
                    )));
                }
            }
        }
        Ok(Self { labels, matrix })
    }

    /// `ρ(i, j) = exp(-decay × |t_i - t_j|)`.
    pub fn exponential_decay(labels: Vec<String>, times: &[f64], decay: f64) -> AnalyticsResult<Self> {
        if times.len() != labels.len() {
            return Err(AnalyticsError::invalid_input("one time per tenor is required"));
        }
        if !(decay.is_finite() && decay >= 0.0) {
            return Err(AnalyticsError::invalid_input(format!("decay {decay} is negative")));
        }
        let n = times.len();
        let matrix = DMatrix::from_fn(n, n, |i, j| (-decay * (times[i] - times[j]).abs()).exp());
        Self::new(labels, matrix)
    }

    /// Tenor labels in matrix order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    fn index(&self, label: &str) -> AnalyticsResult<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| AnalyticsError::UnknownTenor(label.to_string()))
    }

    /// Correlation between two tenors; identical labels give 1 without a lookup.
    pub fn correlation(&self, a: &str, b: &str) -> AnalyticsResult<f64> {
        if a == b {
            return Ok(1.0);
        }
        Ok(self.matrix[(self.index(a)?, self.index(b)?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_lookup_and_short_circuit() {
        let corr = TenorCorrelation::new(
            labels(&["2Y", "5Y"]),
            DMatrix::from_row_slice(2, 2, &[1.0, 0.8, 0.8, 1.0]),
        )
        .unwrap();
        assert_eq!(corr.correlation("2Y", "5Y").unwrap(), 0.8);
        assert_eq!(corr.correlation("30Y", "30Y").unwrap(), 1.0);
        assert!(matches!(corr.correlation("2Y", "30Y"), Err(AnalyticsError::UnknownTenor(t)) if t == "30Y"));
    }

    #[test]
    fn test_rejects_malformed_matrices() {
        let asymmetric = DMatrix::from_row_slice(2, 2, &[1.0, 0.8, 0.7, 1.0]);
        assert!(TenorCorrelation::new(labels(&["2Y", "5Y"]), asymmetric).is_err());
        let out_of_range = DMatrix::from_row_slice(2, 2, &[1.0, 1.2, 1.2, 1.0]);
        assert!(TenorCorrelation::new(labels(&["2Y", "5Y"]), out_of_range).is_err());
        assert!(TenorCorrelation::new(labels(&["2Y"]), DMatrix::identity(2, 2)).is_err());
        assert!(TenorCorrelation::new(labels(&["2Y", "2Y"]), DMatrix::identity(2, 2)).is_err());
    }

    #[test]
    fn test_exponential_decay() {
        let corr = TenorCorrelation::exponential_decay(labels(&["1Y", "2Y", "10Y"]), &[1.0, 2.0, 10.0], 0.1).unwrap();
        assert_relative_eq!(corr.correlation("1Y", "2Y").unwrap(), (-0.1f64).exp(), epsilon = 1e-15);
        assert!(corr.correlation("1Y", "10Y").unwrap() < corr.correlation("1Y", "2Y").unwrap());
        assert_eq!(corr.matrix()[(2, 2)], 1.0);
    }
}
