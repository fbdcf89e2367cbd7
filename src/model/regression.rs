//! Ordinary least squares with an intercept, solved via the normal equations.

/// Variance below which a regressor is treated as constant.
const MIN_REGRESSOR_VARIANCE: f64 = 1e-10;
/// Relative pivot size below which the normal matrix is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Result of a least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// `[intercept, b1, b2, ...]` in regressor order.
    pub coefficients: Vec<f64>,
    /// Sum of squared residuals.
    pub sse: f64,
}

impl OlsFit {
    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    /// Slope of regressor `i` (zero-based, excluding the intercept).
    pub fn slope(&self, i: usize) -> f64 {
        self.coefficients[i + 1]
    }
}

/// Fits `y = a + Σ b_i x_i` by least squares.
///
/// Returns `None` when the inputs have mismatched lengths, when any
/// regressor has (near) zero variance, or when the normal equations are
/// singular.
pub fn fit_with_intercept(regressors: &[&[f64]], y: &[f64]) -> Option<OlsFit> {
    let n = y.len();
    let p = regressors.len() + 1;
    if n < p || regressors.iter().any(|x| x.len() != n) {
        return None;
    }
    if regressors.iter().any(|x| variance(x) <= MIN_REGRESSOR_VARIANCE) {
        return None;
    }

    let row = |k: usize, j: usize| if j == 0 { 1.0 } else { regressors[j - 1][k] };

    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for k in 0..n {
        for i in 0..p {
            let xi = row(k, i);
            xty[i] += xi * y[k];
            for j in 0..p {
                xtx[i][j] += xi * row(k, j);
            }
        }
    }

    let coefficients = solve(xtx, xty)?;
    let sse: f64 = (0..n)
        .map(|k| {
            let fitted: f64 = (0..p).map(|j| coefficients[j] * row(k, j)).sum();
            let r = y[k] - fitted;
            r * r
        })
        .sum();

    Some(OlsFit { coefficients, sse })
}

/// Population variance; `0.0` for an empty slice.
pub fn variance(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let p = b.len();
    let scale = a
        .iter()
        .enumerate()
        .map(|(i, r)| r[i].abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);

    for col in 0..p {
        let pivot = (col..p).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= PIVOT_TOLERANCE * scale {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for r in (col + 1)..p {
            let factor = a[r][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..p {
                a[r][c] -= factor * a[col][c];
            }
            b[r] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; p];
    for i in (0..p).rev() {
        let tail: f64 = ((i + 1)..p).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i][i];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        let fit = fit_with_intercept(&[&x[..]], &y).expect("fit");
        assert!((fit.intercept() - 2.0).abs() < 1e-9);
        assert!((fit.slope(0) - 3.0).abs() < 1e-9);
        assert!(fit.sse < 1e-18);
    }

    #[test]
    fn recovers_two_regressors() {
        let x1 = [0.0, 1.0, 2.0, 0.0, 3.0, 1.0];
        let x2 = [1.0, 0.0, 2.0, 3.0, 0.0, 4.0];
        let y: Vec<f64> = (0..6).map(|i| 1.0 + 0.5 * x1[i] + 2.0 * x2[i]).collect();
        let fit = fit_with_intercept(&[&x1[..], &x2[..]], &y).expect("fit");
        assert!((fit.intercept() - 1.0).abs() < 1e-9);
        assert!((fit.slope(0) - 0.5).abs() < 1e-9);
        assert!((fit.slope(1) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn least_squares_residuals_sum_to_zero() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.1, 1.9, 3.2, 3.8];
        let fit = fit_with_intercept(&[&x[..]], &y).expect("fit");
        let residual_sum: f64 = x
            .iter()
            .zip(y.iter())
            .map(|(xi, yi)| yi - fit.intercept() - fit.slope(0) * xi)
            .sum();
        assert!(residual_sum.abs() < 1e-9);
        assert!(fit.sse > 0.0);
    }

    #[test]
    fn constant_regressor_is_degenerate() {
        let x = [4.0, 4.0, 4.0, 4.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(fit_with_intercept(&[&x[..]], &y).is_none());
    }

    #[test]
    fn collinear_regressors_are_singular() {
        let x1 = [1.0, 2.0, 3.0, 4.0];
        let x2 = [2.0, 4.0, 6.0, 8.0];
        let y = [1.0, 2.0, 3.0, 5.0];
        assert!(fit_with_intercept(&[&x1[..], &x2[..]], &y).is_none());
    }

    #[test]
    fn too_few_points() {
        assert!(fit_with_intercept(&[&[1.0][..]], &[2.0]).is_none());
        assert!(fit_with_intercept(&[&[1.0, 2.0][..]], &[2.0]).is_none());
    }
}
