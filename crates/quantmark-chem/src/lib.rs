//! quantmark Tabulated Chemistry
//!
//! A [`ChemistryProvider`](quantmark_hal::ChemistryProvider) serving model
//! qubit Hamiltonians for a handful of small molecules in the STO-3G basis,
//! together with the exact ground-state energy used as benchmark reference.
//!
//! # Example
//!
//! ```rust
//! use quantmark_chem::TabulatedChemistry;
//! use quantmark_hal::ChemistryProvider;
//! use quantmark_parse::parse_molecule;
//!
//! let molecule = parse_molecule(
//!     "H 0.0 0.0 0.0\nLi 0.0 0.0 1.6",
//!     "sto-3g",
//!     Some("A1 1\nB1 0"),
//!     None,
//! )
//! .unwrap();
//!
//! let problem = TabulatedChemistry::new().problem(&molecule).unwrap();
//! assert_eq!(problem.num_qubits(), 4);
//! assert!(problem.reference_energy.is_some());
//! ```

pub mod exact;
mod models;
mod tabulated;

pub use exact::{MAX_EXACT_QUBITS, ground_state_energy};
pub use tabulated::{TabulatedChemistry, TabulatedEntry};
