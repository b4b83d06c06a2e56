//! Binary logistic regression fitted by batch gradient descent.
//!
//! Features are standardized with the training mean and standard deviation,
//! samples are weighted so both classes contribute equally to the loss, and
//! an L2 penalty of strength `1 / C` keeps the coefficients bounded.

use ndarray::{Array1, Array2, Axis};

use crate::error::ModelError;

/// Gradient descent settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tolerance: f64,
    /// Inverse L2 regularization strength.
    pub c: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-6,
            c: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Fitted {
    coefficients: Array1<f64>,
    intercept: f64,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

/// Logistic regression classifier with balanced class weights.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: LogisticParams,
    fitted: Option<Fitted>,
    /// Weighted log loss per iteration of the last fit.
    pub cost_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(LogisticParams::default())
    }
}

impl LogisticRegression {
    #[must_use]
    pub fn new(params: LogisticParams) -> Self {
        Self {
            params,
            fitted: None,
            cost_history: Vec::new(),
        }
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn weighted_log_loss(y: &Array1<f64>, p: &Array1<f64>, weights: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        let total: f64 = weights.sum();
        -y.iter()
            .zip(p.iter())
            .zip(weights.iter())
            .map(|((&y, &p), &w)| {
                let p = p.clamp(eps, 1.0 - eps);
                w * (y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum::<f64>()
            / total
    }

    /// Per-sample weights `n / (2 * n_class)`.
    ///
    /// A class with no samples contributes nothing, so its weight is irrelevant.
    #[must_use]
    pub fn balanced_weights(y: &Array1<f64>) -> Array1<f64> {
        #[allow(clippy::cast_precision_loss)]
        let n = y.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let positives = y.iter().filter(|&&v| v >= 0.5).count() as f64;
        let negatives = n - positives;

        y.mapv(|v| {
            let class_count = if v >= 0.5 { positives } else { negatives };
            if class_count > 0.0 {
                n / (2.0 * class_count)
            } else {
                0.0
            }
        })
    }

    fn standardize(x: &Array2<f64>, mean: &Array1<f64>, scale: &Array1<f64>) -> Array2<f64> {
        (x - mean) / scale
    }

    /// Fits the model on feature matrix `x` and 0/1 labels `y`.
    ///
    /// # Errors
    /// Returns `InsufficientData` for an empty training set and
    /// `DimensionMismatch` when `x` and `y` disagree on row count.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ModelError::insufficient(0, "empty training set"));
        }

        let n_features = x.ncols();
        let mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
        let xs = Self::standardize(x, &mean, &scale);

        let sample_weights = Self::balanced_weights(y);
        let weight_sum = sample_weights.sum();
        let LogisticParams {
            learning_rate,
            max_iter,
            tolerance,
            c,
        } = self.params;
        let l2 = if c > 0.0 { 1.0 / (c * weight_sum) } else { 0.0 };

        let mut coefficients = Array1::<f64>::zeros(n_features);
        let mut intercept = 0.0;
        self.cost_history.clear();

        for iter in 0..max_iter {
            let predictions = (xs.dot(&coefficients) + intercept).mapv(Self::sigmoid);

            let errors = (&predictions - y) * &sample_weights;
            let dw = xs.t().dot(&errors) / weight_sum + &coefficients * l2;
            let db = errors.sum() / weight_sum;

            coefficients = &coefficients - &(dw * learning_rate);
            intercept -= learning_rate * db;

            let cost = Self::weighted_log_loss(y, &predictions, &sample_weights)
                + 0.5 * l2 * coefficients.dot(&coefficients);
            self.cost_history.push(cost);

            if iter > 0 && (self.cost_history[iter - 1] - cost).abs() < tolerance {
                tracing::debug!("Logistic regression converged at iteration {}", iter);
                break;
            }
        }

        self.fitted = Some(Fitted {
            coefficients,
            intercept,
            mean,
            scale,
        });
        Ok(())
    }

    fn fitted(&self) -> Result<&Fitted, ModelError> {
        self.fitted.as_ref().ok_or(ModelError::NotFitted)
    }

    /// Coefficients on the standardized features.
    pub fn coefficients(&self) -> Result<&Array1<f64>, ModelError> {
        Ok(&self.fitted()?.coefficients)
    }

    pub fn intercept(&self) -> Result<f64, ModelError> {
        Ok(self.fitted()?.intercept)
    }

    /// Probability of the positive class for each row of `x`.
    ///
    /// # Errors
    /// Returns `NotFitted` before `fit` and `DimensionMismatch` when `x`
    /// has a different number of columns than the training data.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let fitted = self.fitted()?;
        if x.ncols() != fitted.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: fitted.coefficients.len(),
                got: x.ncols(),
            });
        }
        let xs = Self::standardize(x, &fitted.mean, &fitted.scale);
        Ok((xs.dot(&fitted.coefficients) + fitted.intercept).mapv(Self::sigmoid))
    }

    /// Class labels (0 or 1) at a 0.5 threshold.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}
