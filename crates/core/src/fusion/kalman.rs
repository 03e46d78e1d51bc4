//! Scalar Kalman update shared by measurement fusion and temporal smoothing

/// Denominators at or below this are treated as singular.
const SINGULAR_EPSILON: f64 = f64::EPSILON;

/// A scalar Gaussian estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    pub variance: f64,
}

impl Gaussian {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    /// Kalman gain `k = P / (P + R)`, `None` when `P + R` is degenerate.
    #[inline]
    pub fn gain(&self, observation_variance: f64) -> Option<f64> {
        let denominator = self.variance + observation_variance;
        if denominator.is_nan() || denominator <= SINGULAR_EPSILON {
            None
        } else {
            Some(self.variance / denominator)
        }
    }

    /// Measurement update against observation `z` with variance `r`.
    ///
    /// Returns `None` instead of dividing by zero when both variances vanish.
    pub fn update(&self, z: f64, r: f64) -> Option<Gaussian> {
        let k = self.gain(r)?;
        Some(Gaussian {
            mean: self.mean + k * (z - self.mean),
            variance: (1.0 - k) * self.variance,
        })
    }

    /// Time update: inflate the variance by the process noise `q`.
    #[inline]
    pub fn predict(&self, q: f64) -> Gaussian {
        Gaussian {
            mean: self.mean,
            variance: self.variance + q,
        }
    }
}

/// Result of folding a set of observations into one estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Combination {
    /// Sequential Bayesian update completed
    Sequential(Gaussian),
    /// A zero denominator was hit; mean of all values, smallest variance
    Averaged(Gaussian),
}

impl Combination {
    pub fn estimate(&self) -> Gaussian {
        match self {
            Combination::Sequential(g) | Combination::Averaged(g) => *g,
        }
    }
}

/// Fuse `(value, variance)` pairs: the first is the prior, the rest are
/// applied in order with [`Gaussian::update`]. `None` for an empty slice.
pub fn combine(observations: &[(f64, f64)]) -> Option<Combination> {
    let ((first_value, first_variance), rest) = observations.split_first()?;
    let mut estimate = Gaussian::new(*first_value, *first_variance);

    for &(value, variance) in rest {
        match estimate.update(value, variance) {
            Some(next) => estimate = next,
            None => return Some(Combination::Averaged(average(observations))),
        }
    }
    Some(Combination::Sequential(estimate))
}

fn average(observations: &[(f64, f64)]) -> Gaussian {
    let n = observations.len() as f64;
    let mean = observations.iter().map(|(v, _)| v).sum::<f64>() / n;
    let variance = observations
        .iter()
        .map(|(_, r)| *r)
        .fold(f64::INFINITY, f64::min);
    Gaussian::new(mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_observation_is_identity() {
        let c = combine(&[(17.25, 0.8)]).unwrap();
        assert_eq!(c, Combination::Sequential(Gaussian::new(17.25, 0.8)));
    }

    #[test]
    fn empty_is_none() {
        assert!(combine(&[]).is_none());
    }

    #[test]
    fn two_gaussians_match_closed_form() {
        // inverse-variance weighting: (10/1 + 20/4) / (1 + 1/4) = 12
        let g = combine(&[(10.0, 1.0), (20.0, 4.0)]).unwrap().estimate();
        assert_relative_eq!(g.mean, 12.0, epsilon = 1e-12);
        assert_relative_eq!(g.variance, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn perfect_prior_ignores_noisy_observation() {
        let g = combine(&[(5.0, 0.0), (9.0, 2.0)]).unwrap();
        assert_eq!(g, Combination::Sequential(Gaussian::new(5.0, 0.0)));
    }

    #[test]
    fn two_perfect_sources_fall_back_to_average() {
        let c = combine(&[(4.0, 0.0), (6.0, 0.0), (8.0, 1.0)]).unwrap();
        assert_eq!(c, Combination::Averaged(Gaussian::new(6.0, 0.0)));
    }

    #[test]
    fn predict_adds_process_noise() {
        let g = Gaussian::new(3.0, 0.2).predict(0.05);
        assert_eq!(g.mean, 3.0);
        assert_relative_eq!(g.variance, 0.25);
    }
}
