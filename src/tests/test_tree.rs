use ndarray::{array, Array2};

use crate::data::{one_hot, Dataset};
use crate::tree::{entropy, DecisionTree};

fn bit_dataset() -> Dataset {
    // The first feature determines the class; the second is noise.
    let features = array![
        [0.0, 0.0],
        [0.0, 1.0],
        [0.0, 1.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [1.0, 0.0]
    ];
    let labels = one_hot(&[0, 0, 0, 1, 1, 1], 2).unwrap();
    Dataset::new(features, labels).unwrap()
}

#[test]
fn test_entropy_values() {
    assert_eq!(entropy(array![1.0, 0.0].view()), 0.0);
    assert!((entropy(array![0.5, 0.5].view()) - 1.0).abs() < 1e-12);
    assert!((entropy(array![0.25, 0.25, 0.25, 0.25].view()) - 2.0).abs() < 1e-12);
}

#[test]
fn test_entropy_clamps_invalid_terms() {
    // Zero probabilities and NaN frequencies (0/0 from an empty split side)
    // must contribute nothing rather than poison the sum.
    assert_eq!(entropy(array![0.0, 0.0].view()), 0.0);
    let with_nan = array![f64::NAN, 1.0];
    assert_eq!(entropy(with_nan.view()), 0.0);
}

#[test]
fn test_tree_separates_on_the_informative_feature() {
    let data = bit_dataset();
    let tree = DecisionTree::fit(&data, 5);
    assert_eq!(tree.error_rate(&data), 0.0);
    // One split on the informative feature suffices.
    assert_eq!(tree.depth(), 1);
}

#[test]
fn test_tree_depth_limit_zero_is_a_single_leaf() {
    let data = bit_dataset();
    let tree = DecisionTree::fit(&data, 0);
    assert_eq!(tree.depth(), 0);
    // The lone leaf predicts the class mean everywhere.
    let prediction = tree.predict(array![0.0, 0.0].view());
    assert_eq!(prediction, &array![0.5, 0.5]);
}

#[test]
fn test_tree_predicts_distribution_on_pure_leaves() {
    let data = bit_dataset();
    let tree = DecisionTree::fit(&data, 5);
    assert_eq!(tree.predict(array![0.0, 1.0].view()), &array![1.0, 0.0]);
    assert_eq!(tree.predict(array![1.0, 1.0].view()), &array![0.0, 1.0]);
}

#[test]
fn test_tree_handles_single_sample() {
    let features = Array2::from_shape_vec((1, 3), vec![1.0, 0.0, 1.0]).unwrap();
    let labels = one_hot(&[1], 2).unwrap();
    let data = Dataset::new(features, labels).unwrap();
    let tree = DecisionTree::fit(&data, 4);
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.error_rate(&data), 0.0);
}
