//! quantmark problem descriptors
//!
//! This crate holds the immutable inputs of a VQE benchmark: the molecule
//! to study and the parameterized ansatz circuit, plus the ordered
//! parameter vector that binds values to the circuit's named parameters.
//!
//! # Core Components
//!
//! - **Molecule**: [`MoleculeDescriptor`], [`Atom`], [`Transformation`] and
//!   [`validate_molecule`]
//! - **Gates**: [`GateOp`] with a [`GateKind`] (rotations, phase, fixed gates)
//! - **Circuit**: [`CircuitDescriptor`] with qubit count, ASAP layering and
//!   gate depth
//! - **Parameters**: [`ParameterVector`]
//!
//! # Example
//!
//! ```rust
//! use quantmark_ir::{Axis, CircuitDescriptor, FixedGate, GateOp, QubitId};
//!
//! let mut circuit = CircuitDescriptor::new();
//! circuit.push(GateOp::rotation(Axis::Y, QubitId(0), "a").unwrap());
//! circuit.push(
//!     GateOp::fixed(FixedGate::X, vec![QubitId(1)])
//!         .unwrap()
//!         .controlled_by([QubitId(0)])
//!         .unwrap(),
//! );
//!
//! assert_eq!(circuit.qubit_count(), 2);
//! assert_eq!(circuit.gate_depth(), 2);
//! assert_eq!(circuit.parameter_names(), vec!["a"]);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod molecule;
pub mod parameter;
pub mod qubit;

pub use circuit::CircuitDescriptor;
pub use error::{IrError, IrResult, MoleculeError};
pub use gate::{Axis, FixedGate, GateKind, GateOp, is_valid_parameter_name};
pub use molecule::{
    ActiveSpace, Atom, MoleculeDescriptor, Transformation, atomic_number, canonical_symbol,
    validate_molecule,
};
pub use parameter::ParameterVector;
pub use qubit::QubitId;
