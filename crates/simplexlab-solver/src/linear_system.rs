use thiserror::Error;

const SINGULAR_TOLERANCE: f64 = 1e-10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinearSystemError {
    #[error("matrix is not square: row {row} has {found} entries, expected {expected}")]
    NotSquare { row: usize, expected: usize, found: usize },
    #[error("right-hand side has {found} entries, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("system is singular or ill-conditioned (no unique solution)")]
    Singular,
}

/// Solves `matrix * x = rhs` by Gaussian elimination with partial pivoting.
pub fn solve_linear_system(matrix: &[Vec<f64>], rhs: &[f64]) -> Result<Vec<f64>, LinearSystemError> {
    let n = matrix.len();
    if rhs.len() != n {
        return Err(LinearSystemError::DimensionMismatch {
            expected: n,
            found: rhs.len(),
        });
    }
    for (row, entries) in matrix.iter().enumerate() {
        if entries.len() != n {
            return Err(LinearSystemError::NotSquare {
                row,
                expected: n,
                found: entries.len(),
            });
        }
    }

    // Augmented matrix [A | b]
    let mut m: Vec<Vec<f64>> = matrix
        .iter()
        .zip(rhs)
        .map(|(row, &b)| {
            let mut aug = row.clone();
            aug.push(b);
            aug
        })
        .collect();

    for i in 0..n {
        let max_row = (i..n)
            .max_by(|&a, &b| m[a][i].abs().total_cmp(&m[b][i].abs()))
            .unwrap_or(i);
        m.swap(i, max_row);

        if m[i][i].abs() < SINGULAR_TOLERANCE {
            return Err(LinearSystemError::Singular);
        }

        for k in (i + 1)..n {
            let factor = m[k][i] / m[i][i];
            for j in i..=n {
                m[k][j] -= factor * m[i][j];
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| m[i][j] * x[j]).sum();
        x[i] = (m[i][n] - sum) / m[i][i];
    }
    Ok(x)
}
