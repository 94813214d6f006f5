//! Dataset handling: feature/label matrices, one-hot encoding, class-subset
//! filtering, and a reader for the raw MNIST IDX files.

use std::fs;
use std::path::Path;

use ndarray::{Array2, Axis};

use crate::error::{MinervaError, Result};
use crate::metrics::argmax;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

const IDX_IMAGE_MAGIC: u32 = 0x0000_0803;
const IDX_LABEL_MAGIC: u32 = 0x0000_0801;

/// A feature matrix with aligned one-hot labels.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array2<f64>,
}

impl Dataset {
    /// Wrap aligned feature/label matrices. Labels must be one-hot: every
    /// row sums to 1.
    pub fn new(features: Array2<f64>, labels: Array2<f64>) -> Result<Self> {
        if features.nrows() != labels.nrows() {
            return Err(MinervaError::dimension_mismatch(
                format!("{} label rows", features.nrows()),
                format!("{} label rows", labels.nrows()),
            ));
        }
        for row in labels.outer_iter() {
            if (row.sum() - 1.0).abs() > 1e-5 {
                return Err(MinervaError::invalid_parameter(
                    "labels".to_string(),
                    "label rows must be one-hot (sum to 1)".to_string(),
                ));
            }
        }
        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn num_classes(&self) -> usize {
        self.labels.ncols()
    }

    /// Keep only the samples labeled with one of `classes`, re-encoding the
    /// labels over the retained classes in the given order.
    pub fn restrict_to_classes(&self, classes: &[usize]) -> Result<Dataset> {
        let mut kept_rows = Vec::new();
        let mut kept_labels = Vec::new();
        for (row, label_row) in self.labels.outer_iter().enumerate() {
            let class = argmax(label_row);
            if let Some(position) = classes.iter().position(|&c| c == class) {
                kept_rows.push(row);
                kept_labels.push(position);
            }
        }
        let features = self.features.select(Axis(0), &kept_rows);
        let labels = one_hot(&kept_labels, classes.len())?;
        Dataset::new(features, labels)
    }
}

/// One-hot encode integer class labels.
pub fn one_hot(labels: &[usize], num_classes: usize) -> Result<Array2<f64>> {
    let mut encoded = Array2::zeros((labels.len(), num_classes));
    for (row, &class) in labels.iter().enumerate() {
        if class >= num_classes {
            return Err(MinervaError::invalid_parameter(
                "labels".to_string(),
                format!("class {} out of range for {} classes", class, num_classes),
            ));
        }
        encoded[[row, class]] = 1.0;
    }
    Ok(encoded)
}

fn read_be_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = bytes
        .get(offset..offset + 4)
        .ok_or_else(|| MinervaError::IoError("truncated IDX header".to_string()))?;
    Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Parse an IDX image file into an `(N x rows*cols)` matrix with pixels
/// scaled to `[0, 1]`.
pub fn read_idx_images<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let bytes = fs::read(path)?;
    let magic = read_be_u32(&bytes, 0)?;
    if magic != IDX_IMAGE_MAGIC {
        return Err(MinervaError::IoError(format!(
            "bad IDX image magic {:#010x}",
            magic
        )));
    }
    let count = read_be_u32(&bytes, 4)? as usize;
    let rows = read_be_u32(&bytes, 8)? as usize;
    let cols = read_be_u32(&bytes, 12)? as usize;
    let end = 16 + count * rows * cols;
    if bytes.len() < end {
        return Err(MinervaError::IoError("truncated IDX image data".to_string()));
    }
    let pixels = bytes[16..end]
        .iter()
        .map(|&b| f64::from(b) / 255.0)
        .collect();
    Array2::from_shape_vec((count, rows * cols), pixels)
        .map_err(|e| MinervaError::IoError(e.to_string()))
}

/// Parse an IDX label file into class indices.
pub fn read_idx_labels<P: AsRef<Path>>(path: P) -> Result<Vec<usize>> {
    let bytes = fs::read(path)?;
    let magic = read_be_u32(&bytes, 0)?;
    if magic != IDX_LABEL_MAGIC {
        return Err(MinervaError::IoError(format!(
            "bad IDX label magic {:#010x}",
            magic
        )));
    }
    let count = read_be_u32(&bytes, 4)? as usize;
    let end = 8 + count;
    if bytes.len() < end {
        return Err(MinervaError::IoError("truncated IDX label data".to_string()));
    }
    Ok(bytes[8..end].iter().map(|&b| b as usize).collect())
}

/// Load the train and test splits from a directory holding the four
/// standard MNIST files. `digits` restricts to a label subset;
/// `as_bit_vector` binarizes pixels at 0.5.
pub fn load_mnist<P: AsRef<Path>>(
    dir: P,
    digits: Option<&[usize]>,
    as_bit_vector: bool,
) -> Result<(Dataset, Dataset)> {
    let dir = dir.as_ref();
    let load_split = |images: &str, labels: &str| -> Result<Dataset> {
        let mut features = read_idx_images(dir.join(images))?;
        if as_bit_vector {
            features.mapv_inplace(|v| if v > 0.5 { 1.0 } else { 0.0 });
        }
        let labels = read_idx_labels(dir.join(labels))?;
        let labels = one_hot(&labels, 10)?;
        let dataset = Dataset::new(features, labels)?;
        match digits {
            Some(subset) => dataset.restrict_to_classes(subset),
            None => Ok(dataset),
        }
    };
    Ok((
        load_split(TRAIN_IMAGES, TRAIN_LABELS)?,
        load_split(TEST_IMAGES, TEST_LABELS)?,
    ))
}
