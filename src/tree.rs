//! A greedy binary-split decision tree over binarized features, trained by
//! information-gain maximization. Each feature is used at most once per
//! root-to-leaf path; leaves predict the class distribution of the samples
//! that reached them.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::data::Dataset;
use crate::metrics::argmax;

/// Fixed split threshold. Features are bit vectors, so any value strictly
/// between 0 and 1 separates the two pixel states.
const SPLIT_VALUE: f64 = 0.004;

/// `x * log2(x)` with invalid values clamped to contribute nothing: log of
/// zero and the 0/0 class frequencies of an empty split side would otherwise
/// propagate NaN/Inf into every entropy sum.
fn plogp(x: f64) -> f64 {
    let e = x * x.log2();
    if e.is_finite() {
        e
    } else {
        0.0
    }
}

/// Shannon entropy of a distribution, in bits.
pub fn entropy(distribution: ArrayView1<f64>) -> f64 {
    -distribution.iter().copied().map(plogp).sum::<f64>()
}

enum Node {
    Leaf {
        value: Array1<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A trained decision tree.
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Grow a tree to at most `depth_limit` splits deep.
    pub fn fit(data: &Dataset, depth_limit: usize) -> Self {
        let columns: Vec<usize> = (0..data.num_features()).collect();
        let default = mean_label(data.labels.view());
        let root = split_node(
            &data.features,
            &data.labels,
            default,
            columns,
            0,
            depth_limit,
        );
        DecisionTree { root }
    }

    /// Class distribution predicted for one sample: walk from the root to a
    /// leaf following the split thresholds.
    pub fn predict(&self, sample: ArrayView1<f64>) -> &Array1<f64> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Fraction of samples whose argmax prediction misses the labeled class.
    pub fn error_rate(&self, data: &Dataset) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        let mut errors = 0usize;
        for (sample, label) in data.features.outer_iter().zip(data.labels.outer_iter()) {
            if argmax(self.predict(sample).view()) != argmax(label) {
                errors += 1;
            }
        }
        errors as f64 / data.len() as f64
    }

    /// Longest root-to-leaf path, counting splits.
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}

fn mean_label(labels: ArrayView2<f64>) -> Array1<f64> {
    labels
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(labels.ncols()))
}

fn split_node(
    x: &Array2<f64>,
    y: &Array2<f64>,
    default: Array1<f64>,
    columns: Vec<usize>,
    depth: usize,
    depth_limit: usize,
) -> Node {
    if y.nrows() == 0 {
        // An empty partition predicts its parent's distribution.
        return Node::Leaf { value: default };
    }

    let value = mean_label(y.view());
    let pure = value.iter().any(|&p| p == 1.0);
    if depth == depth_limit || columns.is_empty() || pure || y.nrows() <= 1 {
        return Node::Leaf { value };
    }

    let (feature, _gain) = choose_feature(x, y, &columns);
    let remaining: Vec<usize> = columns.iter().copied().filter(|&c| c != feature).collect();

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for (row, &v) in x.column(feature).iter().enumerate() {
        if v <= SPLIT_VALUE {
            left_rows.push(row);
        } else {
            right_rows.push(row);
        }
    }

    let x_left = x.select(Axis(0), &left_rows);
    let y_left = y.select(Axis(0), &left_rows);
    let x_right = x.select(Axis(0), &right_rows);
    let y_right = y.select(Axis(0), &right_rows);

    let left = Box::new(split_node(
        &x_left,
        &y_left,
        value.clone(),
        remaining.clone(),
        depth + 1,
        depth_limit,
    ));
    let right = Box::new(split_node(
        &x_right,
        &y_right,
        value,
        remaining,
        depth + 1,
        depth_limit,
    ));

    Node::Split {
        feature,
        threshold: SPLIT_VALUE,
        left,
        right,
    }
}

/// Information gain of splitting each candidate feature at `SPLIT_VALUE`;
/// returns the most informative feature and its gain.
fn choose_feature(x: &Array2<f64>, y: &Array2<f64>, columns: &[usize]) -> (usize, f64) {
    let samples = x.nrows() as f64;
    let base_entropy = entropy(mean_label(y.view()).view());
    let num_classes = y.ncols();

    let mut best = (columns[0], f64::NEG_INFINITY);
    for &feature in columns {
        let split: Vec<bool> = x.column(feature).iter().map(|&v| v <= SPLIT_VALUE).collect();
        let n_left = split.iter().filter(|&&left| left).count() as f64;
        let n_right = samples - n_left;
        let p_left = n_left / samples;

        let mut class_left = Array1::<f64>::zeros(num_classes);
        let mut class_right = Array1::<f64>::zeros(num_classes);
        for (row, label) in y.outer_iter().enumerate() {
            let class = argmax(label);
            if split[row] {
                class_left[class] += 1.0;
            } else {
                class_right[class] += 1.0;
            }
        }
        // Frequencies conditioned on the split side; an empty side yields
        // NaN frequencies whose entropy terms clamp to zero.
        class_left.mapv_inplace(|count| count / n_left);
        class_right.mapv_inplace(|count| count / n_right);

        let conditional =
            p_left * entropy(class_left.view()) + (1.0 - p_left) * entropy(class_right.view());
        let gain = base_entropy - conditional;
        if gain > best.1 {
            best = (feature, gain);
        }
    }
    best
}
