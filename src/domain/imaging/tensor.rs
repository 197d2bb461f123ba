//! Normalized image tensor handed from the preprocessor to the classifier

use ndarray::{Array4, ArrayView1};

use crate::domain::DomainError;

/// A normalized image batch of shape `[1, height, width, 3]`.
///
/// Values are in `[0, 1]`. The tensor is owned by a single identification
/// request and dropped when the request finishes; nothing retains a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    /// Wrap a raw array, enforcing the batch/channel layout.
    pub fn new(data: Array4<f32>) -> Result<Self, DomainError> {
        let shape = data.shape();
        if shape[0] != 1 || shape[3] != 3 {
            return Err(DomainError::internal(format!(
                "expected tensor shape [1, H, W, 3], got {:?}",
                shape
            )));
        }
        Ok(Self { data })
    }

    /// Height and width of the image plane
    pub fn dims(&self) -> (usize, usize) {
        let shape = self.data.shape();
        (shape[1], shape[2])
    }

    /// Total number of scalar features (`H * W * 3`)
    pub fn feature_len(&self) -> usize {
        let (h, w) = self.dims();
        h * w * 3
    }

    /// Flattened row-major view used as the classifier input vector
    pub fn features(&self) -> ArrayView1<'_, f32> {
        // Array4 is row-major by construction, so the flat view is [H, W, C] order.
        self.data
            .view()
            .into_shape_with_order(self.feature_len())
            .expect("contiguous tensor reshapes to its own length")
    }

    /// All values within the normalized range
    pub fn is_normalized(&self) -> bool {
        self.data.iter().all(|v| (0.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_valid_shape() {
        let tensor = ImageTensor::new(Array4::zeros((1, 4, 4, 3))).unwrap();
        assert_eq!(tensor.dims(), (4, 4));
        assert_eq!(tensor.feature_len(), 48);
    }

    #[test]
    fn test_rejects_bad_batch_dim() {
        assert!(ImageTensor::new(Array4::zeros((2, 4, 4, 3))).is_err());
    }

    #[test]
    fn test_rejects_bad_channel_dim() {
        assert!(ImageTensor::new(Array4::zeros((1, 4, 4, 4))).is_err());
    }

    #[test]
    fn test_features_flatten_in_row_major_order() {
        let mut data = Array4::zeros((1, 2, 2, 3));
        data[[0, 0, 0, 0]] = 0.1;
        data[[0, 0, 0, 1]] = 0.2;
        data[[0, 1, 1, 2]] = 0.9;
        let tensor = ImageTensor::new(data).unwrap();

        let features = tensor.features();
        assert_eq!(features.len(), 12);
        assert_eq!(features[0], 0.1);
        assert_eq!(features[1], 0.2);
        assert_eq!(features[11], 0.9);
    }

    #[test]
    fn test_is_normalized() {
        let tensor = ImageTensor::new(Array4::from_elem((1, 2, 2, 3), 0.5)).unwrap();
        assert!(tensor.is_normalized());

        let tensor = ImageTensor::new(Array4::from_elem((1, 2, 2, 3), 1.5)).unwrap();
        assert!(!tensor.is_normalized());
    }
}
