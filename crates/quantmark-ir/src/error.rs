//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors raised while building or binding a circuit descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate was declared without any target qubit.
    #[error("Gate '{gate}' has no target qubits")]
    NoTargets {
        /// Name of the gate.
        gate: String,
    },

    /// The same qubit appears twice among a gate's targets.
    #[error("Duplicate target {qubit} in gate '{gate}'")]
    DuplicateTarget {
        /// The repeated qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate: String,
    },

    /// A control qubit is also one of the gate's targets.
    #[error("Qubit {qubit} is both target and control of gate '{gate}'")]
    ControlIsTarget {
        /// The offending qubit.
        qubit: QubitId,
        /// Name of the gate.
        gate: String,
    },

    /// A rotation gate was declared without a parameter name.
    #[error("Gate '{0}' requires a parameter")]
    MissingParameter(String),

    /// A fixed gate was given a parameter name.
    #[error("Gate '{gate}' does not take a parameter (got '{parameter}')")]
    UnexpectedParameter {
        /// Name of the gate.
        gate: String,
        /// The parameter that was supplied.
        parameter: String,
    },

    /// Parameter names must be non-empty identifiers.
    #[error("Invalid parameter name '{0}'")]
    InvalidParameterName(String),

    /// Gate requires a specific number of targets.
    #[error("Gate '{gate}' requires {expected} targets, got {got}")]
    TargetCountMismatch {
        /// Name of the gate.
        gate: String,
        /// Expected number of targets.
        expected: usize,
        /// Actual number of targets.
        got: usize,
    },

    /// A parameter referenced by the circuit is missing from the binding.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Value count does not match the circuit's parameter count.
    #[error("Expected {expected} parameter values, got {got}")]
    ParameterCountMismatch {
        /// Number of distinct parameters in the circuit.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

/// Shape and type violations found in a molecule descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MoleculeError {
    /// The geometry lists no atoms.
    #[error("Molecule geometry is empty")]
    EmptyGeometry,

    /// Unknown chemical element symbol.
    #[error("Unknown element '{symbol}' (atom {index})")]
    UnknownElement {
        /// The symbol as written.
        symbol: String,
        /// Position of the atom in the geometry.
        index: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("Atom {index} ({symbol}) has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Element symbol.
        symbol: String,
        /// Position of the atom in the geometry.
        index: usize,
    },

    /// Two atoms sit on the same point.
    #[error("Atoms {first} and {second} occupy the same position")]
    OverlappingAtoms {
        /// Index of the first atom.
        first: usize,
        /// Index of the second atom.
        second: usize,
    },

    /// Basis set identifier is blank.
    #[error("Basis set identifier is empty")]
    EmptyBasisSet,

    /// Active space is malformed.
    #[error("Invalid active space: {0}")]
    InvalidActiveSpace(String),
}
