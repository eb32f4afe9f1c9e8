//! Model qubit Hamiltonians at equilibrium geometry, minimal basis.
//!
//! Each model is a number-conserving spin-orbital Hamiltonian: single Z
//! terms for orbital energies, ZZ terms for Coulomb interactions and
//! XX + YY terms for exchange within a spatial orbital pair.

use quantmark_hal::{Pauli, PauliHamiltonian, PauliTerm};

fn model(
    constant: f64,
    orbital_energies: &[f64],
    coulomb: &[(usize, usize, f64)],
    exchange: &[(usize, usize, f64)],
) -> PauliHamiltonian {
    let mut h = PauliHamiltonian::new(vec![PauliTerm::identity(constant)]);
    for (qubit, &energy) in orbital_energies.iter().enumerate() {
        h.add_term(PauliTerm::z(energy, qubit));
    }
    for &(a, b, j) in coulomb {
        h.add_term(PauliTerm::zz(j, a, b));
    }
    for &(a, b, k) in exchange {
        h.add_term(PauliTerm::xx(k, a, b));
        h.add_term(PauliTerm::yy(k, a, b));
    }
    h
}

/// H2 after parity mapping with two-qubit reduction.
pub(crate) fn h2_parity() -> PauliHamiltonian {
    model(
        -0.32,
        &[0.39, -0.39],
        &[(0, 1, -0.01)],
        &[(0, 1, 0.18)],
    )
}

/// H2 in the full four spin-orbital Jordan-Wigner encoding.
pub(crate) fn h2_jordan_wigner() -> PauliHamiltonian {
    let mut h = model(
        -0.8105,
        &[0.1721, 0.1721, -0.2234, -0.2234],
        &[
            (0, 1, 0.1209),
            (0, 2, 0.1686),
            (0, 3, 0.1205),
            (1, 2, 0.1205),
            (1, 3, 0.1686),
            (2, 3, 0.1744),
        ],
        &[],
    );

    // Double excitation between the bonding and antibonding pairs.
    let double = |c: f64, ops: [Pauli; 4]| {
        PauliTerm::new(c, ops.into_iter().enumerate().collect())
    };
    use Pauli::{X, Y};
    h.add_term(double(0.0453, [X, X, Y, Y]));
    h.add_term(double(0.0453, [Y, Y, X, X]));
    h.add_term(double(-0.0453, [X, Y, Y, X]));
    h.add_term(double(-0.0453, [Y, X, X, Y]));
    h
}

/// LiH with a two spatial-orbital active space.
pub(crate) fn lih() -> PauliHamiltonian {
    model(
        -7.4983,
        &[0.1122, 0.1122, -0.1347, -0.1347],
        &[
            (0, 1, 0.0892),
            (0, 2, 0.1104),
            (0, 3, 0.0983),
            (1, 2, 0.0983),
            (1, 3, 0.1104),
            (2, 3, 0.1205),
        ],
        &[(0, 1, 0.0312), (2, 3, 0.0245)],
    )
}

/// BeH2 with a three spatial-orbital active space.
pub(crate) fn beh2() -> PauliHamiltonian {
    model(
        -15.5307,
        &[0.1712, 0.1712, -0.2189, -0.2189, -0.1653, -0.1653],
        &[
            (0, 1, 0.1204),
            (0, 2, 0.1659),
            (0, 3, 0.1198),
            (0, 4, 0.1352),
            (0, 5, 0.1089),
            (1, 2, 0.1198),
            (1, 3, 0.1659),
            (1, 4, 0.1089),
            (1, 5, 0.1352),
            (2, 3, 0.1723),
            (2, 4, 0.1298),
            (2, 5, 0.1156),
            (3, 4, 0.1156),
            (3, 5, 0.1298),
            (4, 5, 0.1412),
        ],
        &[(0, 1, 0.0445), (2, 3, 0.0312), (4, 5, 0.0267)],
    )
}

/// H2O with a four spatial-orbital active space.
pub(crate) fn h2o() -> PauliHamiltonian {
    model(
        -74.6892,
        &[
            0.1789, 0.1789, -0.2456, -0.2456, -0.1923, -0.1923, -0.1534, -0.1534,
        ],
        &[
            (0, 1, 0.1156),
            (0, 2, 0.1589),
            (0, 3, 0.1134),
            (0, 4, 0.1267),
            (0, 5, 0.0989),
            (0, 6, 0.1045),
            (0, 7, 0.0867),
            (1, 2, 0.1134),
            (1, 3, 0.1589),
            (1, 4, 0.0989),
            (1, 5, 0.1267),
            (1, 6, 0.0867),
            (1, 7, 0.1045),
            (2, 3, 0.1678),
            (2, 4, 0.1234),
            (2, 5, 0.1089),
            (2, 6, 0.1156),
            (2, 7, 0.0945),
            (3, 4, 0.1089),
            (3, 5, 0.1234),
            (3, 6, 0.0945),
            (3, 7, 0.1156),
            (4, 5, 0.1389),
            (4, 6, 0.1078),
            (4, 7, 0.0923),
            (5, 6, 0.0923),
            (5, 7, 0.1078),
            (6, 7, 0.1245),
        ],
        &[
            (0, 1, 0.0423),
            (2, 3, 0.0356),
            (4, 5, 0.0289),
            (6, 7, 0.0234),
        ],
    )
}
