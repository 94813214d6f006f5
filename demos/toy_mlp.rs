//! Train a small MLP on a synthetic two-class problem and write the epoch
//! log to `training_log.csv`. Pass a directory holding the four MNIST IDX
//! files to train on real digits instead.

use std::env;
use std::error::Error;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use minerva::activations::Activation;
use minerva::config::ExperimentConfig;
use minerva::data::{load_mnist, one_hot, Dataset};
use minerva::network::{DropoutSettings, Mlp};
use minerva::reporting::CsvLogger;
use minerva::trainer::Trainer;

fn synthetic_split(samples: usize, seed: u64) -> Result<Dataset, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features = Array2::zeros((samples, 4));
    let mut labels = Vec::with_capacity(samples);
    for i in 0..samples {
        let class = i % 2;
        let base: [f64; 4] = if class == 0 {
            [1.0, 1.0, 0.0, 0.0]
        } else {
            [0.0, 0.0, 1.0, 1.0]
        };
        for j in 0..4 {
            features[[i, j]] = base[j] + rng.gen_range(-0.05..0.05);
        }
        labels.push(class);
    }
    Ok(Dataset::new(features, one_hot(&labels, 2)?)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(1234);

    let (train, test, layer_sizes) = match env::args().nth(1) {
        Some(mnist_dir) => {
            let (train, test) = load_mnist(&mnist_dir, None, true)?;
            (train, test, vec![784, 100, 10])
        }
        None => (
            synthetic_split(200, 1)?,
            synthetic_split(100, 2)?,
            vec![4, 8, 2],
        ),
    };

    let mut activations = vec![Activation::Sigmoid; layer_sizes.len() - 2];
    activations.push(Activation::Softmax);

    let mut mlp = Mlp::new(
        &layer_sizes,
        &activations,
        DropoutSettings::disabled(),
        &mut rng,
    )?;

    let config = ExperimentConfig {
        num_epochs: 50,
        minibatch_size: 20,
        learning_rate: 0.1,
        rate_decay: 0.998,
        momentum_initial: 0.5,
        momentum_final: 0.9,
        momentum_t: 20,
        num_epochs_after_overfit: 3,
        check_gradient: false,
        digits: None,
        data_path: None,
    };

    let mut logger = CsvLogger::create("training_log.csv")?;
    let summary = Trainer::new(config).fit(&mut mlp, &train, &test, &mut rng, &mut logger)?;

    println!(
        "trained {} epochs: {} train errors, {} test errors{}",
        summary.epochs_run,
        summary.final_train_errors,
        summary.final_test_errors,
        if summary.stopped_early {
            " (stopped early)"
        } else {
            ""
        }
    );
    println!("epoch log written to training_log.csv");
    Ok(())
}
