//! Dense solves for the small systems that appear in the k-group log-rank
//! statistic (k - 1 unknowns).

const PIVOT_EPS: f64 = 1e-12;

/// Solves `a · x = b` by Gaussian elimination with partial pivoting.
/// `a` is row-major `n × n`. Returns `None` when the matrix is singular.
pub fn solve(a: &[f64], b: &[f64], n: usize) -> Option<Vec<f64>> {
    if a.len() != n * n || b.len() != n {
        return None;
    }
    let mut m = a.to_vec();
    let mut x = b.to_vec();

    for col in 0..n {
        let mut pivot = col;
        let mut best = m[col * n + col].abs();
        for row in (col + 1)..n {
            let v = m[row * n + col].abs();
            if v > best {
                best = v;
                pivot = row;
            }
        }
        if best < PIVOT_EPS || !best.is_finite() {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                m.swap(col * n + k, pivot * n + k);
            }
            x.swap(col, pivot);
        }
        let diag = m[col * n + col];
        for row in (col + 1)..n {
            let factor = m[row * n + col] / diag;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[row * n + k] -= factor * m[col * n + k];
            }
            x[row] -= factor * x[col];
        }
    }

    for col in (0..n).rev() {
        let mut acc = x[col];
        for k in (col + 1)..n {
            acc -= m[col * n + k] * x[k];
        }
        x[col] = acc / m[col * n + col];
    }
    Some(x)
}

/// `vᵀ · A⁻¹ · v`, or `None` if `A` is singular.
pub fn quadratic_form_inv(a: &[f64], v: &[f64], n: usize) -> Option<f64> {
    let y = solve(a, v, n)?;
    Some(v.iter().zip(&y).map(|(vi, yi)| vi * yi).sum())
}
