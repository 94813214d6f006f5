//! Fit the information-gain decision tree on synthetic bit-vector data and
//! report train/test error rates. Pass a directory holding the four MNIST
//! IDX files to fit on real digits instead.

use std::env;
use std::error::Error;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use minerva::data::{load_mnist, one_hot, Dataset};
use minerva::tree::DecisionTree;

fn synthetic_bits(samples: usize, seed: u64) -> Result<Dataset, Box<dyn Error>> {
    // Class = parity of the first two bits; remaining bits are noise.
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((samples, 8));
    let mut labels = Vec::with_capacity(samples);
    for i in 0..samples {
        for j in 0..8 {
            features[[i, j]] = if rng.gen_bool(0.5) { 1.0 } else { 0.0 };
        }
        let class = ((features[[i, 0]] + features[[i, 1]]) as usize) % 2;
        labels.push(class);
    }
    Ok(Dataset::new(features, one_hot(&labels, 2)?)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let (train, test, depth_limit) = match env::args().nth(1) {
        Some(mnist_dir) => {
            let (train, test) = load_mnist(&mnist_dir, None, true)?;
            (train, test, 10)
        }
        None => (synthetic_bits(400, 1)?, synthetic_bits(200, 2)?, 6),
    };

    println!("fitting on {} samples, depth limit {}", train.len(), depth_limit);
    let tree = DecisionTree::fit(&train, depth_limit);

    println!("tree depth: {}", tree.depth());
    println!("training error rate: {:.4}", tree.error_rate(&train));
    println!("test error rate: {:.4}", tree.error_rate(&test));
    Ok(())
}
