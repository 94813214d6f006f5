//! k-determinantal-point-process sampling over a similarity kernel.
//!
//! A DPP assigns higher probability to subsets whose items are dissimilar
//! under the kernel, so sampling from one picks a structurally diverse
//! subset instead of independent uniform draws. The structured dropout
//! strategy uses this to choose which units of the previous layer to retain.
//!
//! The kernel here is small (layer width squared) and symmetric positive
//! semi-definite, so the eigendecomposition is done with cyclic Jacobi
//! rotations directly over `ndarray`.

use ndarray::{Array1, Array2};
use rand::{Rng, RngCore};

/// Eigendecompose a symmetric kernel with cyclic Jacobi rotations.
///
/// Returns `(eigenvalues, eigenvectors)` with one eigenvector per column.
/// Eigenvalues are clamped to be non-negative: roundoff can push a PSD
/// kernel's smallest eigenvalues slightly below zero, and the sampling
/// marginals below divide by sums of them.
pub fn decompose_kernel(kernel: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = kernel.nrows();
    let mut a = kernel.clone();
    let mut v = Array2::<f64>::eye(n);

    const MAX_SWEEPS: usize = 64;
    const OFF_DIAGONAL_TOLERANCE: f64 = 1e-10;

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0f64;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off.sqrt() < OFF_DIAGONAL_TOLERANCE {
            break;
        }

        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < 1e-12 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for i in 0..n {
                    let aip = a[[i, p]];
                    let aiq = a[[i, q]];
                    a[[i, p]] = c * aip - s * aiq;
                    a[[i, q]] = s * aip + c * aiq;
                }
                for i in 0..n {
                    let api = a[[p, i]];
                    let aqi = a[[q, i]];
                    a[[p, i]] = c * api - s * aqi;
                    a[[q, i]] = s * api + c * aqi;
                }
                for i in 0..n {
                    let vip = v[[i, p]];
                    let viq = v[[i, q]];
                    v[[i, p]] = c * vip - s * viq;
                    v[[i, q]] = s * vip + c * viq;
                }
            }
        }
    }

    let eigenvalues = Array1::from_iter((0..n).map(|i| a[[i, i]].max(0.0)));
    (eigenvalues, v)
}

/// Table of elementary symmetric polynomials E[l][m] over the first `m`
/// eigenvalues, for subset sizes up to `k`.
pub fn elementary_symmetric_polynomials(eigenvalues: &Array1<f64>, k: usize) -> Array2<f64> {
    let n = eigenvalues.len();
    let mut e = Array2::<f64>::zeros((k + 1, n + 1));
    e.row_mut(0).fill(1.0);
    for l in 1..=k {
        for m in 1..=n {
            e[[l, m]] = e[[l, m - 1]] + eigenvalues[m - 1] * e[[l - 1, m - 1]];
        }
    }
    e
}

/// Draw a size-`k` subset of item indices from the k-DPP defined by the
/// kernel's eigendecomposition.
///
/// First selects `k` eigenvectors with the exact marginals given by the
/// elementary symmetric polynomials, then samples items one at a time,
/// projecting the remaining eigenvectors away from each chosen item and
/// re-orthonormalizing. Requires `k <= eigenvalues.len()`.
pub fn sample_k(
    k: usize,
    eigenvalues: &Array1<f64>,
    eigenvectors: &Array2<f64>,
    rng: &mut dyn RngCore,
) -> Vec<usize> {
    let n = eigenvalues.len();
    assert!(k <= n, "cannot sample {} items from a {}-item kernel", k, n);
    if k == 0 {
        return Vec::new();
    }

    let e = elementary_symmetric_polynomials(eigenvalues, k);

    // Select which eigenvectors span the elementary DPP.
    let mut selected = Vec::with_capacity(k);
    let mut remaining = k;
    for m in (1..=n).rev() {
        if remaining == 0 {
            break;
        }
        if m == remaining {
            // Every eigenvector left must be taken to reach size k.
            selected.extend(0..m);
            remaining = 0;
            break;
        }
        let denominator = e[[remaining, m]];
        let marginal = if denominator > 0.0 {
            eigenvalues[m - 1] * e[[remaining - 1, m - 1]] / denominator
        } else {
            1.0
        };
        if rng.gen::<f64>() < marginal {
            selected.push(m - 1);
            remaining -= 1;
        }
    }

    // Sample one item per selected eigenvector.
    let mut columns: Vec<Array1<f64>> = selected
        .iter()
        .map(|&j| eigenvectors.column(j).to_owned())
        .collect();
    let mut items = Vec::with_capacity(k);

    while !columns.is_empty() {
        // P(item) is proportional to its squared mass across the remaining
        // eigenvectors.
        let mut weights = vec![0.0f64; n];
        let mut total = 0.0f64;
        for (i, weight) in weights.iter_mut().enumerate() {
            *weight = columns.iter().map(|c| c[i] * c[i]).sum();
            total += *weight;
        }

        let mut draw = rng.gen::<f64>() * total;
        let mut item = n - 1;
        for (i, &weight) in weights.iter().enumerate() {
            if draw < weight {
                item = i;
                break;
            }
            draw -= weight;
        }
        items.push(item);

        // Eliminate the chosen item: combine away the pivot eigenvector so
        // every remaining column is zero at that coordinate.
        let pivot = columns
            .iter()
            .enumerate()
            .max_by(|a, b| a.1[item].abs().total_cmp(&b.1[item].abs()))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let pivot_column = columns.swap_remove(pivot);
        if pivot_column[item].abs() > 0.0 {
            for column in columns.iter_mut() {
                let factor = column[item] / pivot_column[item];
                column.scaled_add(-factor, &pivot_column);
                column[item] = 0.0;
            }
        }

        // Gram-Schmidt the survivors back to an orthonormal set.
        for a in 0..columns.len() {
            for b in 0..a {
                let projection = columns[a].dot(&columns[b]);
                let basis = columns[b].clone();
                columns[a].scaled_add(-projection, &basis);
            }
            let norm = columns[a].dot(&columns[a]).sqrt();
            if norm > 1e-10 {
                columns[a].mapv_inplace(|x| x / norm);
            }
        }
    }

    items
}
