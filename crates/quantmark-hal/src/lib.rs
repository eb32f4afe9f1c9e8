//! quantmark Hardware Abstraction Layer
//!
//! Contracts between the benchmark and its external collaborators:
//!
//! - [`Backend`] / [`BackendFactory`]: evaluate a bound circuit against a
//!   Hamiltonian
//! - [`BackendRegistry`]: backend names, aliases and constructors
//! - [`ChemistryProvider`]: molecule to qubit Hamiltonian
//! - [`PauliHamiltonian`]: the Hamiltonian representation shared by both
//! - [`CancelToken`]: cooperative cancellation for long runs

pub mod backend;
pub mod cancel;
pub mod chemistry;
pub mod error;
pub mod hamiltonian;
pub mod registry;
pub mod seed;

pub use backend::{Backend, BackendConfig, BackendFactory, Shots};
pub use cancel::CancelToken;
pub use chemistry::{ChemistryProvider, MolecularProblem};
pub use error::{HalError, HalResult};
pub use hamiltonian::{Pauli, PauliHamiltonian, PauliTerm};
pub use registry::{BackendInfo, BackendRegistry, ConfiguredBackend};
pub use seed::derive_seed;
