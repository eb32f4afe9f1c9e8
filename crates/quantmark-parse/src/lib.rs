//! Text front-end for quantmark
//!
//! Reads the two textual inputs of a benchmark configuration: the ansatz
//! circuit, written one gate per line, and the molecule text fields
//! (geometry, active orbitals, transformation).
//!
//! # Example
//!
//! ```rust
//! use quantmark_parse::parse_circuit;
//!
//! let circuit = parse_circuit(
//!     "circuit:
//!      Ry(target=(0,), parameter=a)
//!      X(target=(1,), control=(0,))",
//! )
//! .unwrap();
//!
//! assert_eq!(circuit.qubit_count(), 2);
//! assert_eq!(circuit.gate_depth(), 2);
//! ```

pub mod error;
pub mod lexer;
pub mod molecule;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use molecule::{parse_active_orbitals, parse_geometry, parse_molecule, parse_transformation};
pub use parser::{parse_circuit, parse_gate_line};
