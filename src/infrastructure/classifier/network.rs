//! Feed-forward network behind the classifier
//!
//! A small MLP: input -> hidden (ReLU) -> output (softmax). Inference is a
//! pure read; nothing in `forward` mutates the network, so any number of
//! requests may share one instance.

use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::Standard;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Flat, serializable form of the network parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkWeights {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub w1: Vec<f32>,
    pub b1: Vec<f32>,
    pub w2: Vec<f32>,
    pub b2: Vec<f32>,
}

/// MLP with one hidden layer
#[derive(Debug, Clone, PartialEq)]
pub struct MlpNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    // Layer 1: input -> hidden
    w1: Array2<f32>, // [hidden_size, input_size]
    b1: Array1<f32>, // [hidden_size]
    // Layer 2: hidden -> output
    w2: Array2<f32>, // [output_size, hidden_size]
    b2: Array1<f32>, // [output_size]
}

impl MlpNetwork {
    /// Create a network with deterministic seeded initialization.
    ///
    /// Xavier-scaled uniform weights; the same seed and sizes always produce
    /// the same parameters.
    pub fn seeded(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        seed: u64,
    ) -> Result<Self, DomainError> {
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(DomainError::validation(
                "network layer sizes must be non-zero",
            ));
        }

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        let w1_scale = (2.0 / input_size as f32).sqrt();
        let w1 = Array2::from_shape_fn((hidden_size, input_size), |_| {
            (rng.sample::<f32, _>(Standard) - 0.5) * 2.0 * w1_scale
        });
        let b1 = Array1::zeros(hidden_size);

        let w2_scale = (2.0 / hidden_size as f32).sqrt();
        let w2 = Array2::from_shape_fn((output_size, hidden_size), |_| {
            (rng.sample::<f32, _>(Standard) - 0.5) * 2.0 * w2_scale
        });
        let b2 = Array1::zeros(output_size);

        Ok(Self {
            input_size,
            hidden_size,
            output_size,
            w1,
            b1,
            w2,
            b2,
        })
    }

    /// Rebuild a network from its serialized parameters
    pub fn from_weights(weights: NetworkWeights) -> Result<Self, DomainError> {
        let NetworkWeights {
            input_size,
            hidden_size,
            output_size,
            w1,
            b1,
            w2,
            b2,
        } = weights;

        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(DomainError::validation(
                "network layer sizes must be non-zero",
            ));
        }

        let w1 = Array2::from_shape_vec((hidden_size, input_size), w1)
            .map_err(|e| DomainError::validation(format!("w1 shape mismatch: {}", e)))?;
        let b1 = Array1::from_vec(b1);
        if b1.len() != hidden_size {
            return Err(DomainError::validation("b1 length mismatch"));
        }
        let w2 = Array2::from_shape_vec((output_size, hidden_size), w2)
            .map_err(|e| DomainError::validation(format!("w2 shape mismatch: {}", e)))?;
        let b2 = Array1::from_vec(b2);
        if b2.len() != output_size {
            return Err(DomainError::validation("b2 length mismatch"));
        }

        let network = Self {
            input_size,
            hidden_size,
            output_size,
            w1,
            b1,
            w2,
            b2,
        };

        if !network.is_finite() {
            return Err(DomainError::validation(
                "network weights contain non-finite values",
            ));
        }

        Ok(network)
    }

    /// Extract the serializable parameters
    pub fn to_weights(&self) -> NetworkWeights {
        NetworkWeights {
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            output_size: self.output_size,
            w1: self.w1.iter().copied().collect(),
            b1: self.b1.to_vec(),
            w2: self.w2.iter().copied().collect(),
            b2: self.b2.to_vec(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass producing a probability vector that sums to 1
    pub fn forward(&self, features: ArrayView1<'_, f32>) -> Result<Array1<f32>, DomainError> {
        if features.len() != self.input_size {
            return Err(DomainError::validation(format!(
                "expected {} input features, got {}",
                self.input_size,
                features.len()
            )));
        }

        let hidden = (self.w1.dot(&features) + &self.b1).mapv(|v| v.max(0.0));
        let logits = self.w2.dot(&hidden) + &self.b2;
        Ok(softmax(&logits))
    }

    /// Add `delta` to one output-layer bias.
    ///
    /// Used when deriving a retrained version; never called on a version
    /// that is already serving.
    pub fn adjust_output_bias(&mut self, class_index: usize, delta: f32) -> Result<(), DomainError> {
        if class_index >= self.output_size {
            return Err(DomainError::validation(format!(
                "class index {} out of range for {} outputs",
                class_index, self.output_size
            )));
        }
        self.b2[class_index] += delta;
        Ok(())
    }

    /// All parameters are finite
    pub fn is_finite(&self) -> bool {
        self.w1.iter().all(|v| v.is_finite())
            && self.b1.iter().all(|v| v.is_finite())
            && self.w2.iter().all(|v| v.is_finite())
            && self.b2.iter().all(|v| v.is_finite())
    }
}

fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    // Shift by the max for numerical stability.
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp = logits.mapv(|v| (v - max).exp());
    let sum: f32 = exp.sum();
    exp / sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn network() -> MlpNetwork {
        MlpNetwork::seeded(12, 8, 4, 42).unwrap()
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = MlpNetwork::seeded(12, 8, 4, 42).unwrap();
        let b = MlpNetwork::seeded(12, 8, 4, 42).unwrap();
        assert_eq!(a, b);

        let c = MlpNetwork::seeded(12, 8, 4, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_forward_is_probability_distribution() {
        let network = network();
        let input = Array1::from_elem(12, 0.5);
        let output = network.forward(input.view()).unwrap();

        assert_eq!(output.len(), 4);
        let sum: f32 = output.sum();
        assert!((sum - 1.0).abs() < 1e-3);
        assert!(output.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_forward_rejects_wrong_input_len() {
        let network = network();
        let input = Array1::from_elem(5, 0.5);
        assert!(network.forward(input.view()).is_err());
    }

    #[test]
    fn test_weights_roundtrip() {
        let network = network();
        let rebuilt = MlpNetwork::from_weights(network.to_weights()).unwrap();
        assert_eq!(network, rebuilt);
    }

    #[test]
    fn test_from_weights_rejects_shape_mismatch() {
        let mut weights = network().to_weights();
        weights.w1.pop();
        assert!(MlpNetwork::from_weights(weights).is_err());
    }

    #[test]
    fn test_from_weights_rejects_non_finite() {
        let mut weights = network().to_weights();
        weights.w2[0] = f32::NAN;
        assert!(MlpNetwork::from_weights(weights).is_err());
    }

    #[test]
    fn test_adjust_output_bias_shifts_probability() {
        let mut adjusted = network();
        adjusted.adjust_output_bias(2, 2.0).unwrap();

        let input = Array1::from_elem(12, 0.5);
        let before = network().forward(input.view()).unwrap();
        let after = adjusted.forward(input.view()).unwrap();
        assert!(after[2] > before[2]);
    }

    #[test]
    fn test_adjust_output_bias_out_of_range() {
        let mut network = network();
        assert!(network.adjust_output_bias(4, 0.1).is_err());
    }

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(MlpNetwork::seeded(0, 8, 4, 1).is_err());
        assert!(MlpNetwork::seeded(12, 0, 4, 1).is_err());
        assert!(MlpNetwork::seeded(12, 8, 0, 1).is_err());
    }
}
