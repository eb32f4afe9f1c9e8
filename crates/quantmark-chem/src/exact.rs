//! Exact diagonalization of small qubit Hamiltonians.
//!
//! The Hamiltonian is expanded into a dense real matrix, split into the
//! blocks that its off-diagonal terms connect, and each block is
//! diagonalized with cyclic Jacobi rotations.

use quantmark_hal::{Pauli, PauliHamiltonian};

/// Largest register diagonalized exactly (a 1024 x 1024 matrix).
pub const MAX_EXACT_QUBITS: usize = 10;

const MAX_SWEEPS: usize = 64;
const OFF_DIAGONAL_TOLERANCE: f64 = 1e-22;

/// Lowest eigenvalue of `hamiltonian`.
///
/// Returns `None` for Hamiltonians with complex matrix elements (an odd
/// number of Y operators in some term) or more than [`MAX_EXACT_QUBITS`]
/// qubits.
pub fn ground_state_energy(hamiltonian: &PauliHamiltonian) -> Option<f64> {
    if !hamiltonian.is_real() {
        return None;
    }
    let num_qubits = hamiltonian.num_qubits();
    if num_qubits > MAX_EXACT_QUBITS {
        return None;
    }

    let matrix = dense_matrix(hamiltonian, num_qubits);
    components(&matrix)
        .into_iter()
        .map(|block| {
            let mut sub: Vec<Vec<f64>> = block
                .iter()
                .map(|&r| block.iter().map(|&c| matrix[r][c]).collect())
                .collect();
            jacobi_eigenvalues(&mut sub)
                .into_iter()
                .fold(f64::INFINITY, f64::min)
        })
        .reduce(f64::min)
}

/// Dense matrix with `H[j][i] = ⟨j|H|i⟩`.
fn dense_matrix(hamiltonian: &PauliHamiltonian, num_qubits: usize) -> Vec<Vec<f64>> {
    let dim = 1usize << num_qubits;
    let mut matrix = vec![vec![0.0; dim]; dim];

    for term in &hamiltonian.terms {
        let x = term.mask_of(Pauli::X);
        let y = term.mask_of(Pauli::Y);
        let z = term.mask_of(Pauli::Z);
        // i^{nY} is ±1 for real terms.
        let global = if y.count_ones() % 4 == 0 { 1.0 } else { -1.0 };

        for i in 0..dim {
            let j = i ^ (x | y);
            let sign = if (i & (y | z)).count_ones() % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            matrix[j][i] += term.coefficient * global * sign;
        }
    }

    matrix
}

/// Index sets of the blocks connected by non-zero off-diagonal elements.
fn components(matrix: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let dim = matrix.len();
    let mut parent: Vec<usize> = (0..dim).collect();

    fn find(parent: &mut [usize], mut a: usize) -> usize {
        while parent[a] != a {
            parent[a] = parent[parent[a]];
            a = parent[a];
        }
        a
    }

    for (i, row) in matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if i != j && value != 0.0 {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[a] = b;
                }
            }
        }
    }

    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let mut block_of_root = vec![usize::MAX; dim];
    for i in 0..dim {
        let root = find(&mut parent, i);
        if block_of_root[root] == usize::MAX {
            block_of_root[root] = blocks.len();
            blocks.push(Vec::new());
        }
        blocks[block_of_root[root]].push(i);
    }
    blocks
}

/// Eigenvalues of a symmetric matrix by cyclic Jacobi rotations.
fn jacobi_eigenvalues(a: &mut [Vec<f64>]) -> Vec<f64> {
    let n = a.len();

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (0..n).filter(move |&q| q != p).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off < OFF_DIAGONAL_TOLERANCE {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = c * pk - s * qk;
                    a[q][k] = s * pk + c * qk;
                }
            }
        }
    }

    (0..n).map(|i| a[i][i]).collect()
}
