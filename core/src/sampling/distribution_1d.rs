//! 1D Distribution.

use crate::lumen::*;

/// Represents a piecewise-constant 1D function’s PDF and CDF and provides methods to perform this sampling efficiently.
#[derive(Clone, Debug, Default)]
pub struct Distribution1D {
    /// Piecewise-constant function.
    pub func: Vec<Float>,

    /// CDF for `func`.
    pub cdf: Vec<Float>,

    /// Integral of `func`.
    pub func_int: Float,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for given piecewise-constant function.
    ///
    /// - `f` - Piecewise-constant 1D function.
    pub fn new(f: Vec<Float>) -> Self {
        let n = f.len();

        // Compute integral of step function at `x_i`
        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 1..n + 1 {
            cdf.push(cdf[i - 1] + f[i - 1] / n as Float);
        }

        // Transform step function integral into CDF.
        let func_int = cdf[n];
        if func_int == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1).take(n) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1).take(n) {
                *v /= func_int;
            }
        }

        Self { func: f, cdf, func_int }
    }

    /// Returns the number of sample points for the piecewise-constant function.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Returns the integral of the function.
    pub fn integral(&self) -> Float {
        self.func_int * self.count() as Float
    }

    /// Return a sample from the discrete distribution given a random sample.
    /// The result is the sampled offset, its probability mass and the random
    /// sample remapped to [0, 1) within the chosen CDF segment.
    ///
    /// - `u` - The random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        // Find surrounding CDF segments and `offset`.
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);
        let pdf = if self.func_int > 0.0 {
            self.func[offset] / (self.func_int * self.count() as Float)
        } else {
            0.0
        };
        let u_remapped = (u - self.cdf[offset]) / (self.cdf[offset + 1] - self.cdf[offset]);
        debug_assert!((0.0..=1.0).contains(&u_remapped));

        (offset, pdf, u_remapped)
    }

    /// Return the PDF for sampling a given value from the discrete PDF.
    ///
    /// * `index` - Sample index.
    pub fn discrete_pdf(&self, index: usize) -> Float {
        debug_assert!(index < self.count());
        self.func[index] / (self.func_int * self.count() as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn discrete_pdf_is_normalized() {
        let d = Distribution1D::new(vec![1.0, 2.0, 3.0, 4.0]);
        let sum: Float = (0..d.count()).map(|i| d.discrete_pdf(i)).sum();
        assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, d.discrete_pdf(3), 0.4, epsilon = 1e-6));
    }

    #[test]
    fn sample_discrete_matches_discrete_pdf() {
        let d = Distribution1D::new(vec![0.5, 0.0, 1.5]);
        for i in 0..1000 {
            let u = (i as Float + 0.5) / 1000.0;
            let (offset, pdf, u_remapped) = d.sample_discrete(u);
            assert!(offset < d.count());
            assert_eq!(pdf, d.discrete_pdf(offset));
            assert!((0.0..=1.0).contains(&u_remapped));
        }
    }

    #[test]
    fn sample_discrete_proportional_to_weights() {
        let d = Distribution1D::new(vec![1.0, 3.0]);
        let n = 10_000;
        let picks = (0..n)
            .filter(|i| d.sample_discrete((*i as Float + 0.5) / n as Float).0 == 1)
            .count();
        assert!((picks as Float / n as Float - 0.75).abs() < 1e-3);
    }

    #[test]
    fn integral_sums_weights() {
        let d = Distribution1D::new(vec![2.0, 4.0]);
        assert!(approx_eq!(Float, d.integral(), 6.0, epsilon = 1e-6));
    }
}
