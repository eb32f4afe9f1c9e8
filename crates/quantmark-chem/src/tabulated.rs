//! Chemistry provider backed by a table of model Hamiltonians.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use quantmark_hal::{ChemistryProvider, HalError, HalResult, MolecularProblem, PauliHamiltonian};
use quantmark_ir::{MoleculeDescriptor, Transformation};

use crate::exact::ground_state_energy;
use crate::models;

/// Orbital symmetry of one molecule in one basis set.
struct OrbitalTable {
    formula: &'static str,
    basis: &'static str,
    point_group: &'static str,
    /// Spatial orbitals per irreducible representation.
    irreps: &'static [(&'static str, u32)],
}

impl OrbitalTable {
    fn total_orbitals(&self) -> usize {
        self.irreps.iter().map(|(_, n)| *n as usize).sum()
    }

    fn orbitals_in(&self, irrep: &str) -> Option<u32> {
        self.irreps
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(irrep))
            .map(|(_, n)| *n)
    }

    fn labels(&self) -> String {
        self.irreps
            .iter()
            .map(|(label, _)| *label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const ORBITALS: &[OrbitalTable] = &[
    OrbitalTable {
        formula: "H2",
        basis: "sto-3g",
        point_group: "D2h",
        irreps: &[("Ag", 1), ("B1u", 1)],
    },
    OrbitalTable {
        formula: "HLi",
        basis: "sto-3g",
        point_group: "C2v",
        irreps: &[("A1", 4), ("B1", 1), ("B2", 1)],
    },
    OrbitalTable {
        formula: "BeH2",
        basis: "sto-3g",
        point_group: "D2h",
        irreps: &[("Ag", 3), ("B1u", 2), ("B2u", 1), ("B3u", 1)],
    },
    OrbitalTable {
        formula: "H2O",
        basis: "sto-3g",
        point_group: "C2v",
        irreps: &[("A1", 4), ("B1", 1), ("B2", 2)],
    },
];

/// One tabulated Hamiltonian.
#[derive(Debug, Clone, Serialize)]
pub struct TabulatedEntry {
    /// Molecular formula in Hill order.
    pub formula: &'static str,
    pub basis: &'static str,
    pub transformation: Transformation,
    /// Number of active spatial orbitals.
    pub active_orbitals: usize,
    pub num_qubits: usize,
    #[serde(skip)]
    build: fn() -> PauliHamiltonian,
}

impl TabulatedEntry {
    const fn new(
        formula: &'static str,
        transformation: Transformation,
        active_orbitals: usize,
        num_qubits: usize,
        build: fn() -> PauliHamiltonian,
    ) -> Self {
        Self {
            formula,
            basis: "sto-3g",
            transformation,
            active_orbitals,
            num_qubits,
            build,
        }
    }

    pub fn hamiltonian(&self) -> PauliHamiltonian {
        (self.build)()
    }
}

impl fmt::Display for TabulatedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} active orbitals / {} / {} qubits",
            self.formula, self.basis, self.active_orbitals, self.transformation, self.num_qubits
        )
    }
}

const ENTRIES: &[TabulatedEntry] = &[
    TabulatedEntry::new("H2", Transformation::JordanWigner, 2, 4, models::h2_jordan_wigner),
    TabulatedEntry::new("H2", Transformation::Parity, 2, 2, models::h2_parity),
    TabulatedEntry::new("HLi", Transformation::JordanWigner, 2, 4, models::lih),
    TabulatedEntry::new("BeH2", Transformation::JordanWigner, 3, 6, models::beh2),
    TabulatedEntry::new("H2O", Transformation::JordanWigner, 4, 8, models::h2o),
];

/// Chemistry provider serving pre-computed model Hamiltonians.
///
/// Molecules are matched by formula, basis set, active-space size and
/// fermion-to-qubit mapping (Jordan-Wigner when unset). Geometry is taken
/// to be at equilibrium. The reference energy of every problem is the
/// exact ground-state energy of its Hamiltonian.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabulatedChemistry;

impl TabulatedChemistry {
    pub fn new() -> Self {
        Self
    }

    /// All tabulated Hamiltonians.
    pub fn entries(&self) -> &'static [TabulatedEntry] {
        ENTRIES
    }

    fn orbital_table(&self, molecule: &MoleculeDescriptor) -> HalResult<&'static OrbitalTable> {
        let formula = molecule.formula();
        let candidates: Vec<&OrbitalTable> =
            ORBITALS.iter().filter(|t| t.formula == formula).collect();
        if candidates.is_empty() {
            return Err(HalError::UnsupportedMolecule(format!(
                "no tabulated data for {formula} (known: {})",
                known_formulas()
            )));
        }
        candidates
            .into_iter()
            .find(|t| t.basis.eq_ignore_ascii_case(molecule.basis_set()))
            .ok_or_else(|| {
                HalError::UnsupportedMolecule(format!(
                    "{formula} is only tabulated in sto-3g, not '{}'",
                    molecule.basis_set()
                ))
            })
    }

    /// Number of active spatial orbitals after checking every index.
    fn active_size(table: &OrbitalTable, molecule: &MoleculeDescriptor) -> HalResult<usize> {
        let Some(active) = molecule.active_orbitals() else {
            return Ok(table.total_orbitals());
        };

        let mut size = 0;
        for (irrep, indices) in active {
            let available = table.orbitals_in(irrep).ok_or_else(|| {
                HalError::InvalidActiveSpace(format!(
                    "irrep '{irrep}' does not exist in {} (irreps: {})",
                    table.point_group,
                    table.labels()
                ))
            })?;
            if let Some(&index) = indices.iter().find(|&&i| i >= available) {
                return Err(HalError::InvalidActiveSpace(format!(
                    "orbital {index} of irrep '{irrep}' is out of range: {} {} has {available} orbital(s) in {irrep}",
                    table.formula, table.basis
                )));
            }
            size += indices.len();
        }
        Ok(size)
    }

    fn entry(&self, molecule: &MoleculeDescriptor) -> HalResult<&'static TabulatedEntry> {
        let table = self.orbital_table(molecule)?;
        let active = Self::active_size(table, molecule)?;
        let transformation = molecule
            .transformation()
            .cloned()
            .unwrap_or(Transformation::JordanWigner);

        ENTRIES
            .iter()
            .find(|e| {
                e.formula == table.formula
                    && e.active_orbitals == active
                    && e.transformation == transformation
            })
            .ok_or_else(|| {
                let available = ENTRIES
                    .iter()
                    .filter(|e| e.formula == table.formula)
                    .map(|e| format!("{} active orbitals with {}", e.active_orbitals, e.transformation))
                    .collect::<Vec<_>>()
                    .join("; ");
                HalError::UnsupportedMolecule(format!(
                    "{} with {active} active orbitals and {transformation} is not tabulated (available: {available})",
                    table.formula
                ))
            })
    }
}

fn known_formulas() -> String {
    ORBITALS
        .iter()
        .map(|t| t.formula)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ChemistryProvider for TabulatedChemistry {
    fn name(&self) -> &str {
        "tabulated"
    }

    fn validate(&self, molecule: &MoleculeDescriptor) -> HalResult<()> {
        self.entry(molecule).map(|_| ())
    }

    #[instrument(skip_all, fields(formula = %molecule.formula()))]
    fn problem(&self, molecule: &MoleculeDescriptor) -> HalResult<MolecularProblem> {
        let entry = self.entry(molecule)?;
        let hamiltonian = entry.hamiltonian();
        let mut problem = MolecularProblem::new(hamiltonian);
        if let Some(energy) = ground_state_energy(&problem.hamiltonian) {
            problem = problem.with_reference_energy(energy);
        }
        debug!(
            qubits = entry.num_qubits,
            terms = problem.hamiltonian.num_terms(),
            reference = ?problem.reference_energy,
            "loaded tabulated Hamiltonian"
        );
        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantmark_ir::{ActiveSpace, Atom};
    use std::collections::BTreeSet;

    fn lih(basis: &str) -> MoleculeDescriptor {
        MoleculeDescriptor::new(
            vec![
                Atom::new("H", [0.0, 0.0, 0.0]),
                Atom::new("Li", [0.0, 0.0, 1.6]),
            ],
            basis,
        )
        .unwrap()
    }

    fn active(pairs: &[(&str, &[u32])]) -> ActiveSpace {
        pairs
            .iter()
            .map(|(irrep, idx)| ((*irrep).to_string(), idx.iter().copied().collect::<BTreeSet<_>>()))
            .collect()
    }

    #[test]
    fn test_lih_active_space() {
        let molecule = lih("STO-3G")
            .with_active_orbitals(active(&[("A1", &[1]), ("B1", &[0])]))
            .unwrap();
        let chem = TabulatedChemistry::new();
        chem.validate(&molecule).unwrap();
        let problem = chem.problem(&molecule).unwrap();
        assert_eq!(problem.num_qubits(), 4);
        assert!((problem.reference_energy.unwrap() + 8.1998).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_orbital() {
        let molecule = lih("sto-3g")
            .with_active_orbitals(active(&[("A1", &[1]), ("B1", &[3])]))
            .unwrap();
        let err = TabulatedChemistry::new().validate(&molecule).unwrap_err();
        assert!(matches!(err, HalError::InvalidActiveSpace(_)));
    }

    #[test]
    fn test_unknown_irrep() {
        let molecule = lih("sto-3g")
            .with_active_orbitals(active(&[("Ag", &[0])]))
            .unwrap();
        let err = TabulatedChemistry::new().validate(&molecule).unwrap_err();
        assert!(matches!(err, HalError::InvalidActiveSpace(_)));
    }

    #[test]
    fn test_unsupported_basis_and_formula() {
        let chem = TabulatedChemistry::new();
        assert!(matches!(
            chem.validate(&lih("cc-pvdz")),
            Err(HalError::UnsupportedMolecule(_))
        ));

        let helium = MoleculeDescriptor::new(vec![Atom::new("He", [0.0; 3])], "sto-3g").unwrap();
        assert!(matches!(
            chem.validate(&helium),
            Err(HalError::UnsupportedMolecule(_))
        ));
    }

    #[test]
    fn test_full_space_without_entry() {
        // LiH has six orbitals in sto-3g; only the two-orbital model exists.
        let err = TabulatedChemistry::new().validate(&lih("sto-3g")).unwrap_err();
        assert!(matches!(err, HalError::UnsupportedMolecule(_)));
    }

    #[test]
    fn test_h2_transformations() {
        let h2 = MoleculeDescriptor::new(
            vec![
                Atom::new("H", [0.0, 0.0, 0.0]),
                Atom::new("H", [0.0, 0.0, 0.74]),
            ],
            "sto-3g",
        )
        .unwrap();
        let chem = TabulatedChemistry::new();

        let jw = chem.problem(&h2).unwrap();
        assert_eq!(jw.num_qubits(), 4);

        let parity = chem
            .problem(&h2.clone().with_transformation(Transformation::Parity))
            .unwrap();
        assert_eq!(parity.num_qubits(), 2);
        assert!((parity.reference_energy.unwrap() + 1.169_069_263_8).abs() < 1e-8);

        let bk = h2.with_transformation(Transformation::BravyiKitaev);
        assert!(matches!(
            chem.validate(&bk),
            Err(HalError::UnsupportedMolecule(_))
        ));
    }

    #[test]
    fn test_entries_listing() {
        let entries = TabulatedChemistry::new().entries();
        assert_eq!(entries.len(), 5);
        for entry in entries {
            assert_eq!(entry.hamiltonian().num_qubits(), entry.num_qubits);
        }
        assert_eq!(
            entries[2].to_string(),
            "HLi / sto-3g / 2 active orbitals / jordan-wigner / 4 qubits"
        );
    }
}
