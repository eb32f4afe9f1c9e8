//! Chemistry collaborator contract.

use quantmark_ir::MoleculeDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::HalResult;
use crate::hamiltonian::PauliHamiltonian;

/// Qubit Hamiltonian of a molecule, with its exact ground-state energy when
/// the provider knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularProblem {
    pub hamiltonian: PauliHamiltonian,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_energy: Option<f64>,
}

impl MolecularProblem {
    pub fn new(hamiltonian: PauliHamiltonian) -> Self {
        Self {
            hamiltonian,
            reference_energy: None,
        }
    }

    pub fn with_reference_energy(mut self, energy: f64) -> Self {
        self.reference_energy = Some(energy);
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.hamiltonian.num_qubits()
    }
}

/// Turns molecule descriptors into qubit Hamiltonians.
pub trait ChemistryProvider: Send + Sync {
    /// Provider name for logs and reports.
    fn name(&self) -> &str;

    /// Check that the provider can handle the molecule.
    ///
    /// This is where active orbitals are checked against the basis set;
    /// failures are [`HalError::InvalidActiveSpace`](crate::HalError::InvalidActiveSpace).
    fn validate(&self, molecule: &MoleculeDescriptor) -> HalResult<()>;

    /// Build the qubit Hamiltonian for a validated molecule.
    fn problem(&self, molecule: &MoleculeDescriptor) -> HalResult<MolecularProblem>;
}
