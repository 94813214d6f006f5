//! Classification metrics reported by the training driver.

use ndarray::{ArrayView1, ArrayView2};

/// Index of the largest entry in a row.
pub fn argmax(row: ArrayView1<f64>) -> usize {
    row.iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Number of samples whose predicted class (argmax of the predicted
/// distribution) differs from the labeled class.
pub fn num_errors(targets: ArrayView2<f64>, predictions: ArrayView2<f64>) -> usize {
    targets
        .outer_iter()
        .zip(predictions.outer_iter())
        .filter(|(target, prediction)| argmax(target.view()) != argmax(prediction.view()))
        .count()
}

/// Fraction of misclassified samples.
pub fn error_rate(targets: ArrayView2<f64>, predictions: ArrayView2<f64>) -> f64 {
    if targets.nrows() == 0 {
        return 0.0;
    }
    num_errors(targets, predictions) as f64 / targets.nrows() as f64
}

/// Root-mean-square of `1 - predicted probability of the true class`.
pub fn rmse(targets: ArrayView2<f64>, predictions: ArrayView2<f64>) -> f64 {
    if targets.nrows() == 0 {
        return 0.0;
    }
    let mut accumulated = 0.0f64;
    for (target, prediction) in targets.outer_iter().zip(predictions.outer_iter()) {
        let miss = 1.0 - prediction[argmax(target.view())];
        accumulated += miss * miss;
    }
    (accumulated / targets.nrows() as f64).sqrt()
}
