use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;

use crate::activations::Activation;
use crate::error::{BirdshotError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward regressor: a stack of dense layers plus the optimizer that trains them.
#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes, activations, and optimizer.
    /// `layer_sizes` includes the input and output sizes, so it must be one longer than
    /// `activations`.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(BirdshotError::invalid_parameter(
                "layer_sizes",
                "network needs at least an input and an output size",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(BirdshotError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{}", activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(BirdshotError::invalid_parameter(
                "layer_sizes",
                "every layer needs at least one unit",
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                DenseLayer::new(window[0], window[1], activation, WeightInit::for_activation(activation), rng)
            })
            .collect();

        Ok(NeuralNetwork { layers, optimizer })
    }

    /// ReLU on every hidden layer and a linear output layer.
    pub fn regressor<R: Rng + ?Sized>(
        input_size: usize,
        hidden: &[usize],
        output_size: usize,
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        let mut layer_sizes = Vec::with_capacity(hidden.len() + 2);
        layer_sizes.push(input_size);
        layer_sizes.extend_from_slice(hidden);
        layer_sizes.push(output_size);

        let mut activations = vec![Activation::Relu; hidden.len()];
        activations.push(Activation::Linear);
        Self::new(&layer_sizes, &activations, optimizer, rng)
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    /// Evaluate a single input vector.
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Evaluate a batch of input rows.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs)?;
        let mut current_output = inputs.to_owned();
        for layer in &self.layers {
            current_output = layer.predict_batch(current_output.view());
        }
        Ok(current_output)
    }

    /// One gradient step minimising the mean squared error between the network's
    /// outputs on `inputs` and `targets`. Returns the loss before the step.
    pub fn train_minibatch(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        self.check_input(inputs)?;
        let mut outputs = inputs.to_owned();
        for layer in &mut self.layers {
            outputs = layer.forward_batch(outputs.view());
        }
        if outputs.dim() != targets.dim() {
            return Err(BirdshotError::dimension_mismatch(
                format!("targets of shape {:?}", outputs.dim()),
                format!("{:?}", targets.dim()),
            ));
        }

        let diff = &outputs - &targets;
        let count = diff.len().max(1) as f32;
        let loss = diff.mapv(|d| d * d).sum() / count;
        // d(mean of squares)/d(output)
        let mut current_error = diff * (2.0 / count);

        let mut gradients = Vec::with_capacity(self.layers.len());
        for layer in self.layers.iter().rev() {
            let layer_gradients = layer.backward_batch(current_error.view()).ok_or_else(|| {
                BirdshotError::dimension_mismatch("a recorded forward pass", "none")
            })?;
            current_error = layer_gradients.input_error;
            gradients.push((layer_gradients.weights, layer_gradients.biases));
        }
        gradients.reverse();

        self.optimizer.begin_step();
        for (index, (layer, (weight_gradients, bias_gradients))) in
            self.layers.iter_mut().zip(gradients).enumerate()
        {
            self.optimizer.update_weights(index, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(index, &mut layer.biases, &bias_gradients, learning_rate);
        }

        Ok(loss)
    }

    fn check_input(&self, inputs: ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(BirdshotError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{}", inputs.ncols()),
            ));
        }
        Ok(())
    }
}
