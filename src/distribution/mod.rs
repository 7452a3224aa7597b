//! Definition of the distribution module
//!
//! A `Distribution` is the local conditional likelihood model of a continuous or binary node.
//! Its parameters are `Param`s, so they may be constants, other variables, or functions of the
//! whole assignment.

use crate::util::Result;
use crate::variable::Assignment;

use rand::Rng;
use rand_distr::StandardNormal;
use special::Gamma as SpecialGamma;

use std::f64::consts::PI;

mod param;

pub use self::param::{DerivedFn, Param};

/// Probabilities this close to 0 or 1 replace a Bernoulli parameter of exactly 0 or 1
const BERNOULLI_CLAMP: f64 = 1e-5;


#[derive(Clone, Debug)]
pub enum Distribution {

    /// Normal with the given mean and variance
    Normal { mean: Param, variance: Param },

    /// Gamma with shape `alpha` and rate `beta`
    Gamma { alpha: Param, beta: Param },

    /// Inverse-Gamma with shape `alpha` and scale `beta`
    InverseGamma { alpha: Param, beta: Param },

    /// Poisson with rate `lambda`, over the strictly positive integers
    Poisson { lambda: Param },

    /// Beta with shape parameters `alpha` and `beta`
    Beta { alpha: Param, beta: Param },

    /// Bernoulli with success probability `p`
    Bernoulli { p: Param },

    /// Binomial with `n` trials and success probability `p`
    Binomial { n: Param, p: Param }
}


impl Distribution {

    pub fn normal<M: Into<Param>, V: Into<Param>>(mean: M, variance: V) -> Self {
        Distribution::Normal { mean: mean.into(), variance: variance.into() }
    }

    pub fn gamma<A: Into<Param>, B: Into<Param>>(alpha: A, beta: B) -> Self {
        Distribution::Gamma { alpha: alpha.into(), beta: beta.into() }
    }

    pub fn inverse_gamma<A: Into<Param>, B: Into<Param>>(alpha: A, beta: B) -> Self {
        Distribution::InverseGamma { alpha: alpha.into(), beta: beta.into() }
    }

    pub fn poisson<L: Into<Param>>(lambda: L) -> Self {
        Distribution::Poisson { lambda: lambda.into() }
    }

    pub fn beta<A: Into<Param>, B: Into<Param>>(alpha: A, beta: B) -> Self {
        Distribution::Beta { alpha: alpha.into(), beta: beta.into() }
    }

    pub fn bernoulli<P: Into<Param>>(p: P) -> Self {
        Distribution::Bernoulli { p: p.into() }
    }

    pub fn binomial<N: Into<Param>, P: Into<Param>>(n: N, p: P) -> Self {
        Distribution::Binomial { n: n.into(), p: p.into() }
    }


    /// The log-likelihood of the value assigned to `name`, with every parameter resolved against
    /// the same `assignment`.
    ///
    /// Values outside the support, and parameters outside their valid range, have a
    /// log-likelihood of negative infinity.
    ///
    /// # Errors
    /// * `GibbsError::MissingValue` if `name`, or a variable a parameter refers to, is not assigned
    /// * `GibbsError::TypeMismatch` if one of those holds a label
    pub fn log_likelihood(&self, name: &str, assignment: &Assignment) -> Result<f64> {
        let x = assignment.real(name)?;

        if !self.in_support(x) {
            return Ok(f64::NEG_INFINITY);
        }

        let ll = match *self {
            Distribution::Normal { ref mean, ref variance } => {
                normal_ln_pdf(x, mean.resolve(assignment)?, variance.resolve(assignment)?)
            },
            Distribution::Gamma { ref alpha, ref beta } => {
                gamma_ln_pdf(x, alpha.resolve(assignment)?, beta.resolve(assignment)?)
            },
            Distribution::InverseGamma { ref alpha, ref beta } => {
                inverse_gamma_ln_pdf(x, alpha.resolve(assignment)?, beta.resolve(assignment)?)
            },
            Distribution::Poisson { ref lambda } => {
                poisson_ln_pmf(x, lambda.resolve(assignment)?)
            },
            Distribution::Beta { ref alpha, ref beta } => {
                beta_ln_pdf(x, alpha.resolve(assignment)?, beta.resolve(assignment)?)
            },
            Distribution::Bernoulli { ref p } => {
                bernoulli_ln_pmf(x, p.resolve(assignment)?)
            },
            Distribution::Binomial { ref n, ref p } => {
                binomial_ln_pmf(x, n.resolve(assignment)?, p.resolve(assignment)?)
            }
        };

        Ok(if ll.is_nan() { f64::NEG_INFINITY } else { ll })
    }


    /// Check whether `x` is in the support of this `Distribution`
    pub fn in_support(&self, x: f64) -> bool {
        match *self {
            Distribution::Normal { .. } => x.is_finite(),
            Distribution::Gamma { .. } | Distribution::InverseGamma { .. } => {
                x.is_finite() && x > 0.0
            },
            Distribution::Poisson { .. } => x.is_finite() && x > 0.0 && x.fract() == 0.0,
            Distribution::Beta { .. } => x > 0.0 && x <= 1.0,
            Distribution::Bernoulli { .. } => x == 0.0 || x == 1.0,
            Distribution::Binomial { .. } => x.is_finite() && x >= 0.0 && x.fract() == 0.0
        }
    }


    /// Check whether this `Distribution` is over the integers
    pub fn is_integral(&self) -> bool {
        match *self {
            Distribution::Poisson { .. }
            | Distribution::Bernoulli { .. }
            | Distribution::Binomial { .. } => true,
            _ => false
        }
    }


    /// Propose a Metropolis candidate by perturbing `previous` with Gaussian noise of the given
    /// variance. Integral distributions round the perturbed value.
    ///
    /// An out-of-support candidate is replaced by `previous` itself, not redrawn.
    pub fn propose<R: Rng>(&self, previous: f64, variance: f64, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        let mut candidate = previous + variance.sqrt() * z;

        if self.is_integral() {
            candidate = candidate.round();
        }

        if self.in_support(candidate) { candidate } else { previous }
    }
}


/// `c * ln(y)`, taken to be zero when `c` is zero
fn xlny(c: f64, y: f64) -> f64 {
    if c == 0.0 { 0.0 } else { c * y.ln() }
}

fn ln_gamma(x: f64) -> f64 {
    SpecialGamma::ln_gamma(x).0
}

fn normal_ln_pdf(x: f64, mean: f64, variance: f64) -> f64 {
    if !(variance > 0.0) {
        return f64::NEG_INFINITY;
    }
    -0.5 * (2.0 * PI * variance).ln() - (x - mean).powi(2) / (2.0 * variance)
}

fn gamma_ln_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0 && beta > 0.0) {
        return f64::NEG_INFINITY;
    }
    alpha * beta.ln() - ln_gamma(alpha) + xlny(alpha - 1.0, x) - beta * x
}

fn inverse_gamma_ln_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0 && beta > 0.0) {
        return f64::NEG_INFINITY;
    }
    alpha * beta.ln() - ln_gamma(alpha) - (alpha + 1.0) * x.ln() - beta / x
}

fn poisson_ln_pmf(x: f64, lambda: f64) -> f64 {
    if !(lambda > 0.0) {
        return f64::NEG_INFINITY;
    }
    x * lambda.ln() - lambda - ln_gamma(x + 1.0)
}

fn beta_ln_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0 && beta > 0.0) {
        return f64::NEG_INFINITY;
    }
    let ln_beta_fn = ln_gamma(alpha) + ln_gamma(beta) - ln_gamma(alpha + beta);
    xlny(alpha - 1.0, x) + xlny(beta - 1.0, 1.0 - x) - ln_beta_fn
}

fn bernoulli_ln_pmf(x: f64, p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NEG_INFINITY;
    }
    let p = p.clamp(BERNOULLI_CLAMP, 1.0 - BERNOULLI_CLAMP);
    if x == 1.0 { p.ln() } else { (1.0 - p).ln() }
}

fn binomial_ln_pmf(x: f64, n: f64, p: f64) -> f64 {
    if !(n >= 0.0 && n.fract() == 0.0 && (0.0..=1.0).contains(&p)) || x > n {
        return f64::NEG_INFINITY;
    }
    let ln_choose = ln_gamma(n + 1.0) - ln_gamma(x + 1.0) - ln_gamma(n - x + 1.0);
    ln_choose + xlny(x, p) + xlny(n - x, 1.0 - p)
}
