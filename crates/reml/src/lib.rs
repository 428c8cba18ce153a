//! # tellus-reml
//!
//! Restricted Maximum Likelihood (REML) hyperparameter estimation for
//! composite network/station Gaussian processes over displacement
//! observations.
//!
//! ## Workflow
//!
//! ```ignore
//! let spec = RemlSpec::new(
//!     ModelSpec::new(["se-se"], vec![1.0, 30.0, 100.0]),
//!     ModelSpec::new(["fogm", "p1"], vec![0.5, 50.0]),
//! )
//! .with_network_fixed(vec![2]);
//! let fit = spec.fit(&observations)?;
//! println!("log likelihood = {}", fit.log_likelihood());
//! ```
//!
//! The objective is the restricted log-likelihood: the trend coefficients
//! of every basis column are marginalized out before maximization. Free
//! hyperparameters are searched in log space (Nelder-Mead), so fitted
//! values are always strictly positive. Indefinite covariances at trial
//! points are recovered by steering the optimizer away; the same failure
//! at the accepted optimum is an error.

mod error;
mod fit;
mod likelihood;
mod params;
mod spec;

pub(crate) mod optimizer;

pub use error::RemlError;
pub use fit::RemlFit;
pub use likelihood::restricted_log_likelihood;
pub use spec::RemlSpec;
