//! quantmark Classical Optimizers
//!
//! The [`Optimizer`] contract drives a VQE run one iteration at a time:
//! each [`Optimizer::step`] may call the energy [`Objective`] as often as
//! it needs and returns the next parameters plus a convergence flag.
//!
//! Four methods ship with the crate:
//!
//! | Method | Calls per step | Notes |
//! |--------|----------------|-------|
//! | [`Bfgs`] | 2n + 1 + line search | quasi-Newton, parameter-shift gradients |
//! | [`NelderMead`] | 1-2 (n+1 on the first step, n on a shrink) | derivative-free simplex |
//! | [`Spsa`] | 2 | stochastic, seeded per repetition |
//! | [`GradientDescent`] | 2n | parameter-shift gradients |
//!
//! [`OptimizerConfig`] selects one by name and builds a fresh instance for
//! every repetition.
//!
//! # Example
//!
//! ```rust
//! use quantmark_ir::ParameterVector;
//! use quantmark_opt::{OptResult, OptimizerConfig, OptimizerFactory};
//!
//! let config = OptimizerConfig::new("nelder-mead").with_hyperparameter("tolerance", 1e-9);
//! let mut optimizer = config.create(1, 0).unwrap();
//!
//! let mut objective = |p: &ParameterVector| -> OptResult<f64> { Ok((p.values()[0] - 2.0).powi(2)) };
//! let mut params = ParameterVector::zeros(vec!["x".into()]);
//! for _ in 0..200 {
//!     let step = optimizer.step(&mut objective, &params).unwrap();
//!     params = step.parameters;
//!     if step.converged {
//!         break;
//!     }
//! }
//! assert!((params.values()[0] - 2.0).abs() < 1e-3);
//! ```

pub mod bfgs;
pub mod config;
pub mod error;
pub mod gradient;
pub mod nelder_mead;
pub mod optimizer;
pub mod spsa;

pub use bfgs::Bfgs;
pub use config::{MODULES, Method, OptimizerConfig};
pub use error::{OptError, OptResult};
pub use gradient::{GradientDescent, parameter_shift_gradient};
pub use nelder_mead::NelderMead;
pub use optimizer::{Objective, Optimizer, OptimizerFactory, Step, evaluate};
pub use spsa::Spsa;
