//! Molecule descriptor.
//!
//! A [`MoleculeDescriptor`] is the problem statement handed to a chemistry
//! provider: nuclear geometry, basis set, an optional active space and an
//! optional fermion-to-qubit mapping. Only shape and type are checked here;
//! whether an active space fits the basis set is the provider's call.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::MoleculeError;

/// Element symbols from hydrogen to krypton, indexed by atomic number - 1.
const ELEMENTS: [&str; 36] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr",
];

/// Minimum distance (Å) between two distinct nuclei.
const MIN_SEPARATION: f64 = 1e-6;

/// Atomic number of an element symbol, matched case-insensitively.
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ELEMENTS
        .iter()
        .position(|e| e.eq_ignore_ascii_case(symbol))
        .map(|i| i as u32 + 1)
}

/// Canonical capitalization of an element symbol.
pub fn canonical_symbol(symbol: &str) -> Option<&'static str> {
    ELEMENTS.iter().find(|e| e.eq_ignore_ascii_case(symbol)).copied()
}

/// One nucleus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub symbol: String,
    /// Cartesian position in Ångström.
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(symbol: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            symbol: symbol.into(),
            position,
        }
    }

    fn distance(&self, other: &Atom) -> f64 {
        self.position
            .iter()
            .zip(other.position.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Fermion-to-qubit mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transformation {
    JordanWigner,
    BravyiKitaev,
    Parity,
    /// A mapping the chemistry provider knows by name.
    Custom(String),
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformation::JordanWigner => write!(f, "jordan-wigner"),
            Transformation::BravyiKitaev => write!(f, "bravyi-kitaev"),
            Transformation::Parity => write!(f, "parity"),
            Transformation::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Active orbitals per irreducible representation.
pub type ActiveSpace = BTreeMap<String, BTreeSet<u32>>;

/// The molecular problem to benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeDescriptor {
    geometry: Vec<Atom>,
    basis_set: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_orbitals: Option<ActiveSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transformation: Option<Transformation>,
}

impl MoleculeDescriptor {
    /// Build and validate a descriptor with no active space and the
    /// provider's default mapping.
    pub fn new(geometry: Vec<Atom>, basis_set: impl Into<String>) -> Result<Self, MoleculeError> {
        let descriptor = Self {
            geometry,
            basis_set: basis_set.into(),
            active_orbitals: None,
            transformation: None,
        };
        validate_molecule(&descriptor)?;
        Ok(descriptor)
    }

    /// Restrict the problem to an active space.
    pub fn with_active_orbitals(mut self, active: ActiveSpace) -> Result<Self, MoleculeError> {
        self.active_orbitals = Some(active);
        validate_molecule(&self)?;
        Ok(self)
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = Some(transformation);
        self
    }

    pub fn geometry(&self) -> &[Atom] {
        &self.geometry
    }

    pub fn basis_set(&self) -> &str {
        &self.basis_set
    }

    pub fn active_orbitals(&self) -> Option<&ActiveSpace> {
        self.active_orbitals.as_ref()
    }

    pub fn transformation(&self) -> Option<&Transformation> {
        self.transformation.as_ref()
    }

    pub fn num_atoms(&self) -> usize {
        self.geometry.len()
    }

    /// Total nuclear charge, i.e. the electron count of the neutral molecule.
    pub fn num_electrons(&self) -> u32 {
        self.geometry
            .iter()
            .filter_map(|a| atomic_number(&a.symbol))
            .sum()
    }

    /// Molecular formula in Hill order.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for atom in &self.geometry {
            let symbol = canonical_symbol(&atom.symbol).unwrap_or(atom.symbol.as_str());
            *counts.entry(symbol).or_default() += 1;
        }

        let mut out = String::new();
        let mut emit = |symbol: &str, n: usize| {
            out.push_str(symbol);
            if n > 1 {
                out.push_str(&n.to_string());
            }
        };

        if let Some(c) = counts.remove("C") {
            emit("C", c);
            if let Some(h) = counts.remove("H") {
                emit("H", h);
            }
        }
        for (symbol, n) in counts {
            emit(symbol, n);
        }
        out
    }
}

/// Check the shape of a molecule descriptor.
pub fn validate_molecule(molecule: &MoleculeDescriptor) -> Result<(), MoleculeError> {
    if molecule.geometry.is_empty() {
        return Err(MoleculeError::EmptyGeometry);
    }

    for (index, atom) in molecule.geometry.iter().enumerate() {
        if atomic_number(&atom.symbol).is_none() {
            return Err(MoleculeError::UnknownElement {
                symbol: atom.symbol.clone(),
                index,
            });
        }
        if atom.position.iter().any(|x| !x.is_finite()) {
            return Err(MoleculeError::NonFiniteCoordinate {
                symbol: atom.symbol.clone(),
                index,
            });
        }
    }

    for (i, a) in molecule.geometry.iter().enumerate() {
        for (j, b) in molecule.geometry.iter().enumerate().skip(i + 1) {
            if a.distance(b) < MIN_SEPARATION {
                return Err(MoleculeError::OverlappingAtoms {
                    first: i,
                    second: j,
                });
            }
        }
    }

    if molecule.basis_set.trim().is_empty() {
        return Err(MoleculeError::EmptyBasisSet);
    }

    if let Some(active) = &molecule.active_orbitals {
        if active.is_empty() {
            return Err(MoleculeError::InvalidActiveSpace(
                "no irreducible representations listed".into(),
            ));
        }
        for (irrep, orbitals) in active {
            if irrep.trim().is_empty() {
                return Err(MoleculeError::InvalidActiveSpace(
                    "blank irreducible representation label".into(),
                ));
            }
            if orbitals.is_empty() {
                return Err(MoleculeError::InvalidActiveSpace(format!(
                    "irrep '{irrep}' has no orbitals"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lih() -> Vec<Atom> {
        vec![Atom::new("H", [0.0, 0.0, 0.0]), Atom::new("Li", [0.0, 0.0, 1.6])]
    }

    #[test]
    fn test_formula_hill_order() {
        let m = MoleculeDescriptor::new(lih(), "sto-3g").unwrap();
        assert_eq!(m.formula(), "HLi");
        assert_eq!(m.num_electrons(), 4);

        let methane = MoleculeDescriptor::new(
            vec![
                Atom::new("H", [0.6, 0.6, 0.6]),
                Atom::new("C", [0.0, 0.0, 0.0]),
                Atom::new("H", [-0.6, -0.6, 0.6]),
                Atom::new("H", [-0.6, 0.6, -0.6]),
                Atom::new("H", [0.6, -0.6, -0.6]),
            ],
            "sto-3g",
        )
        .unwrap();
        assert_eq!(methane.formula(), "CH4");

        let water = MoleculeDescriptor::new(
            vec![
                Atom::new("O", [0.0, 0.0, 0.0]),
                Atom::new("H", [0.76, 0.59, 0.0]),
                Atom::new("H", [-0.76, 0.59, 0.0]),
            ],
            "sto-3g",
        )
        .unwrap();
        assert_eq!(water.formula(), "H2O");
    }

    #[test]
    fn test_empty_geometry() {
        assert_eq!(
            MoleculeDescriptor::new(vec![], "sto-3g"),
            Err(MoleculeError::EmptyGeometry)
        );
    }

    #[test]
    fn test_unknown_element_and_bad_coordinates() {
        let err = MoleculeDescriptor::new(vec![Atom::new("Xx", [0.0; 3])], "sto-3g");
        assert!(matches!(err, Err(MoleculeError::UnknownElement { index: 0, .. })));

        let err = MoleculeDescriptor::new(vec![Atom::new("H", [f64::NAN, 0.0, 0.0])], "sto-3g");
        assert!(matches!(err, Err(MoleculeError::NonFiniteCoordinate { .. })));
    }

    #[test]
    fn test_overlapping_atoms() {
        let err = MoleculeDescriptor::new(
            vec![Atom::new("H", [0.0; 3]), Atom::new("H", [0.0; 3])],
            "sto-3g",
        );
        assert_eq!(
            err,
            Err(MoleculeError::OverlappingAtoms {
                first: 0,
                second: 1
            })
        );
    }

    #[test]
    fn test_blank_basis() {
        assert_eq!(
            MoleculeDescriptor::new(lih(), "  "),
            Err(MoleculeError::EmptyBasisSet)
        );
    }

    #[test]
    fn test_active_space_shape() {
        let m = MoleculeDescriptor::new(lih(), "sto-3g").unwrap();

        let mut active = ActiveSpace::new();
        active.insert("A1".into(), BTreeSet::from([1]));
        active.insert("B1".into(), BTreeSet::from([0]));
        let ok = m.clone().with_active_orbitals(active).unwrap();
        assert_eq!(ok.active_orbitals().map(|a| a.len()), Some(2));

        let mut empty_irrep = ActiveSpace::new();
        empty_irrep.insert("A1".into(), BTreeSet::new());
        assert!(matches!(
            m.clone().with_active_orbitals(empty_irrep),
            Err(MoleculeError::InvalidActiveSpace(_))
        ));

        assert!(matches!(
            m.with_active_orbitals(ActiveSpace::new()),
            Err(MoleculeError::InvalidActiveSpace(_))
        ));
    }

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(atomic_number("li"), Some(3));
        assert_eq!(atomic_number("Kr"), Some(36));
        assert_eq!(atomic_number("Rb"), None);
        assert_eq!(canonical_symbol("BE"), Some("Be"));
    }
}
