//! Pauli Hamiltonian representation.
//!
//! A Hamiltonian is represented as a sum of Pauli strings:
//! H = Σᵢ cᵢ Pᵢ
//! where each Pᵢ is a tensor product of Pauli operators.

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }
}

impl std::fmt::Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One term cᵢ · (P₀ ⊗ P₁ ⊗ … ⊗ Pₙ).
///
/// Only non-identity operators are stored; an empty list is the scalar term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub coefficient: f64,
    /// `(qubit, pauli)` pairs.
    pub operators: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    pub fn new(coefficient: f64, operators: Vec<(usize, Pauli)>) -> Self {
        Self {
            coefficient,
            operators,
        }
    }

    /// Scalar term.
    pub fn identity(coefficient: f64) -> Self {
        Self::new(coefficient, vec![])
    }

    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Z)])
    }

    pub fn x(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::X)])
    }

    pub fn zz(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::new(coefficient, vec![(qubit1, Pauli::Z), (qubit2, Pauli::Z)])
    }

    pub fn xx(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::new(coefficient, vec![(qubit1, Pauli::X), (qubit2, Pauli::X)])
    }

    pub fn yy(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::new(coefficient, vec![(qubit1, Pauli::Y), (qubit2, Pauli::Y)])
    }

    pub fn is_identity(&self) -> bool {
        self.operators.iter().all(|(_, p)| *p == Pauli::I)
    }

    pub fn max_qubit(&self) -> Option<usize> {
        self.operators.iter().map(|(q, _)| *q).max()
    }

    /// Bit mask of the qubits carrying `pauli`.
    pub fn mask_of(&self, pauli: Pauli) -> usize {
        self.operators
            .iter()
            .filter(|(_, p)| *p == pauli)
            .fold(0, |m, (q, _)| m | (1 << q))
    }

    /// True when the term's matrix has only real entries (even number of Ys).
    pub fn is_real(&self) -> bool {
        self.operators.iter().filter(|(_, p)| *p == Pauli::Y).count() % 2 == 0
    }
}

impl std::fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.4} ", self.coefficient)?;
        } else {
            write!(f, "{:.4} ", self.coefficient)?;
        }

        if self.is_identity() {
            write!(f, "I")?;
        } else {
            for (i, (qubit, pauli)) in self.operators.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{pauli}[{qubit}]")?;
            }
        }
        Ok(())
    }
}

/// A Hamiltonian represented as a sum of Pauli terms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PauliHamiltonian {
    pub terms: Vec<PauliTerm>,
}

impl PauliHamiltonian {
    pub fn new(terms: Vec<PauliTerm>) -> Self {
        Self { terms }
    }

    pub fn add_term(&mut self, term: PauliTerm) {
        self.terms.push(term);
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits the Hamiltonian acts on.
    pub fn num_qubits(&self) -> usize {
        self.terms
            .iter()
            .filter_map(PauliTerm::max_qubit)
            .max()
            .map_or(0, |m| m + 1)
    }

    /// Sum of the scalar terms.
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }

    pub fn non_identity_terms(&self) -> impl Iterator<Item = &PauliTerm> {
        self.terms.iter().filter(|t| !t.is_identity())
    }

    /// Every term has a real matrix.
    pub fn is_real(&self) -> bool {
        self.terms.iter().all(PauliTerm::is_real)
    }

    /// Check coefficients and operator lists.
    pub fn validate(&self) -> HalResult<()> {
        for (i, term) in self.terms.iter().enumerate() {
            if !term.coefficient.is_finite() {
                return Err(HalError::InvalidHamiltonian(format!(
                    "term {i} has a non-finite coefficient"
                )));
            }
            for (j, (q, _)) in term.operators.iter().enumerate() {
                if term.operators[..j].iter().any(|(other, _)| other == q) {
                    return Err(HalError::InvalidHamiltonian(format!(
                        "term {i} acts twice on qubit {q}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for PauliHamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Hamiltonian ({} terms, {} qubits):",
            self.num_terms(),
            self.num_qubits()
        )?;
        for term in &self.terms {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}
