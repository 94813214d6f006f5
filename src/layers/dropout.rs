use ndarray::{s, Array2, Axis};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::dpp;

/// Dropout strategy bound to a layer at construction time. The serde names
/// match the strings accepted in configuration files
/// (`nodropout`, `random`, `dpp`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropoutKind {
    #[default]
    NoDropout,
    Random,
    Dpp,
}

/// Multiply each non-bias entry of a bias-augmented input batch by an
/// independent Bernoulli(1 - prob) draw. Every sample row gets its own mask
/// for every column. No train-time rescaling; the test path compensates by
/// scaling the weights instead.
pub fn random_mask(prev_z: &mut Array2<f64>, prob: f64, rng: &mut dyn RngCore) {
    let units = prev_z.ncols() - 1;
    let keep = 1.0 - prob;
    prev_z.slice_mut(s![.., ..units]).map_inplace(|v| {
        if !rng.gen_bool(keep) {
            *v = 0.0;
        }
    });
}

/// Structured dropout: keep a size-k subset of the previous layer's units
/// drawn from a k-DPP over the similarity of their outgoing weight columns,
/// and zero every other non-bias input column. One subset is shared by the
/// whole batch. Strict no-op when `prob` is 0.
pub fn dpp_mask(prev_z: &mut Array2<f64>, weights: &Array2<f64>, prob: f64, rng: &mut dyn RngCore) {
    if prob == 0.0 {
        return;
    }
    let units = weights.nrows() - 1;

    // Unit-normalize each outgoing weight column, then square the Gram
    // matrix of the input units elementwise to get the similarity kernel.
    let mut normalized = weights.slice(s![..-1, ..]).to_owned();
    for mut column in normalized.axis_iter_mut(Axis(1)) {
        let norm = column.dot(&column).sqrt();
        if norm > 0.0 {
            column.mapv_inplace(|x| x / norm);
        }
    }
    let kernel = normalized.dot(&normalized.t()).mapv(|x| x * x);

    let (eigenvalues, eigenvectors) = dpp::decompose_kernel(&kernel);
    let k = ((1.0 - prob) * units as f64).floor() as usize;
    let retained = dpp::sample_k(k, &eigenvalues, &eigenvectors, rng);

    let mut keep = vec![false; units];
    for &unit in &retained {
        keep[unit] = true;
    }
    for (unit, &kept) in keep.iter().enumerate() {
        if !kept {
            prev_z.column_mut(unit).fill(0.0);
        }
    }
}
