//! # Optimizers
//!
//! Parameter update rules applied layer by layer after each backward pass.
//! Stateful optimizers keep one set of moment estimates per layer, indexed by
//! the layer's position in the network, and advance their step counter once
//! per minibatch through [`Optimizer::begin_step`].

use ndarray::{Array1, Array2, ArrayBase, Dimension, OwnedRepr, Zip};

pub trait Optimizer {
    /// Called once before the per-layer updates of a minibatch.
    fn begin_step(&mut self) {}
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
}

#[derive(Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with bias-corrected first and second moment estimates.
///
/// Moment buffers are created lazily the first time a layer index is seen,
/// so the optimizer can be built before the network it trains.
#[derive(Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

fn ensure_slot<D: Dimension>(slots: &mut Vec<Array<D>>, index: usize, dim: D) {
    while slots.len() <= index {
        slots.push(ArrayBase::zeros(dim.clone()));
    }
    if slots[index].raw_dim() != dim {
        slots[index] = ArrayBase::zeros(dim);
    }
}

type Array<D> = ArrayBase<OwnedRepr<f32>, D>;

#[allow(clippy::too_many_arguments)]
fn adam_update<D: Dimension>(
    params: &mut Array<D>,
    gradients: &Array<D>,
    m: &mut Array<D>,
    v: &mut Array<D>,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: i32,
    learning_rate: f32,
) {
    let bias1 = 1.0 - beta1.powi(t);
    let bias2 = 1.0 - beta2.powi(t);
    Zip::from(params)
        .and(gradients)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
            let m_hat = *m / bias1;
            let v_hat = *v / bias2;
            *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
        });
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        ensure_slot(&mut self.m_weights, layer, weights.raw_dim());
        ensure_slot(&mut self.v_weights, layer, weights.raw_dim());
        adam_update(
            weights,
            gradients,
            &mut self.m_weights[layer],
            &mut self.v_weights[layer],
            self.beta1,
            self.beta2,
            self.epsilon,
            self.t.max(1),
            learning_rate,
        );
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        ensure_slot(&mut self.m_biases, layer, biases.raw_dim());
        ensure_slot(&mut self.v_biases, layer, biases.raw_dim());
        adam_update(
            biases,
            gradients,
            &mut self.m_biases[layer],
            &mut self.v_biases[layer],
            self.beta1,
            self.beta2,
            self.epsilon,
            self.t.max(1),
            learning_rate,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sgd_step() {
        let mut sgd = SGD::new();
        let mut weights = array![[1.0, 2.0]];
        sgd.update_weights(0, &mut weights, &array![[0.5, -1.0]], 0.1);
        assert!((weights[[0, 0]] - 0.95).abs() < 1e-6);
        assert!((weights[[0, 1]] - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_adam_first_step_moves_by_learning_rate() {
        let mut adam = Adam::default();
        adam.begin_step();
        let mut biases = array![0.0, 0.0];
        adam.update_biases(0, &mut biases, &array![2.0, -3.0], 0.01);
        // The bias-corrected first step is lr * sign(g)
        assert!((biases[0] + 0.01).abs() < 1e-5);
        assert!((biases[1] - 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_adam_keeps_state_per_layer() {
        let mut adam = Adam::default();
        adam.begin_step();
        let mut first = array![[0.0]];
        let mut second = array![[0.0, 0.0]];
        adam.update_weights(0, &mut first, &array![[1.0]], 0.01);
        adam.update_weights(1, &mut second, &array![[1.0, 1.0]], 0.01);
        assert_eq!(adam.m_weights.len(), 2);
        assert_eq!(adam.m_weights[1].dim(), (1, 2));
    }
}
