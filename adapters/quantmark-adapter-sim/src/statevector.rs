//! Statevector simulation engine.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use quantmark_hal::{Pauli, PauliTerm};
use quantmark_ir::{Axis, FixedGate, GateKind, GateOp, ParameterVector};

/// Single-qubit gate matrix `[[a, b], [c, d]]`.
type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a gate with parameters taken from `parameters`.
    ///
    /// Parameters must already be checked as bound; an unbound name applies
    /// angle zero.
    pub fn apply(&mut self, gate: &GateOp, parameters: &ParameterVector) {
        let theta = gate
            .parameter()
            .and_then(|name| parameters.get(name))
            .unwrap_or(0.0);
        let controls = gate.controls().iter().fold(0, |m, q| m | (1 << q.index()));

        match gate.kind() {
            GateKind::Fixed(FixedGate::Swap) => {
                let t = gate.targets();
                self.apply_swap(controls, t[0].index(), t[1].index());
            }
            kind => {
                let matrix = gate_matrix(kind, theta);
                for target in gate.targets() {
                    self.apply_matrix(controls, target.index(), &matrix);
                }
            }
        }
    }

    /// Apply a 2x2 unitary on `target`, conditioned on every bit of
    /// `controls` being set.
    fn apply_matrix(&mut self, controls: usize, target: usize, m: &Matrix2) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & controls == controls {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, controls: usize, q1: usize, q2: usize) {
        let m1 = 1 << q1;
        let m2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 && i & controls == controls {
                let j = (i & !m1) | m2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Exact ⟨ψ|P|ψ⟩ for one Pauli string (without its coefficient).
    pub fn pauli_expectation(&self, term: &PauliTerm) -> f64 {
        let x = term.mask_of(Pauli::X);
        let y = term.mask_of(Pauli::Y);
        let z = term.mask_of(Pauli::Z);
        let flip = x | y;
        let sign_mask = y | z;

        // P|i⟩ = i^{nY} (-1)^{|i ∧ (y ∨ z)|} |i ⊕ flip⟩
        let global = match y.count_ones() % 4 {
            0 => ONE,
            1 => I,
            2 => -ONE,
            _ => -I,
        };

        let mut acc = ZERO;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let sign = if (i & sign_mask).count_ones() % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            acc += self.amplitudes[i ^ flip].conj() * amp * sign;
        }
        (global * acc).re
    }

    /// Rotate every qubit carrying X or Y into the Z basis.
    pub fn rotate_to_z_basis(&mut self, term: &PauliTerm) {
        let h = gate_matrix(GateKind::Fixed(FixedGate::H), 0.0);
        let sdg = gate_matrix(GateKind::Fixed(FixedGate::Sdg), 0.0);
        for (qubit, pauli) in &term.operators {
            match pauli {
                Pauli::X => self.apply_matrix(0, *qubit, &h),
                Pauli::Y => {
                    self.apply_matrix(0, *qubit, &sdg);
                    self.apply_matrix(0, *qubit, &h);
                }
                Pauli::Z | Pauli::I => {}
            }
        }
    }

    /// Measurement probabilities of the computational basis states.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }
}

fn gate_matrix(kind: GateKind, theta: f64) -> Matrix2 {
    let half = theta / 2.0;
    let (c, s) = (Complex64::new(half.cos(), 0.0), Complex64::new(half.sin(), 0.0));
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let phase = |angle: f64| Complex64::from_polar(1.0, angle);

    match kind {
        GateKind::Rotation(Axis::X) => [[c, -I * s], [-I * s, c]],
        GateKind::Rotation(Axis::Y) => [[c, -s], [s, c]],
        GateKind::Rotation(Axis::Z) => [[phase(-half), ZERO], [ZERO, phase(half)]],
        GateKind::Phase => [[ONE, ZERO], [ZERO, phase(theta)]],
        GateKind::Fixed(fixed) => match fixed {
            FixedGate::H => [[h, h], [h, -h]],
            FixedGate::X => [[ZERO, ONE], [ONE, ZERO]],
            FixedGate::Y => [[ZERO, -I], [I, ZERO]],
            FixedGate::Z => [[ONE, ZERO], [ZERO, -ONE]],
            FixedGate::S => [[ONE, ZERO], [ZERO, I]],
            FixedGate::Sdg => [[ONE, ZERO], [ZERO, -I]],
            FixedGate::T => [[ONE, ZERO], [ZERO, phase(std::f64::consts::FRAC_PI_4)]],
            FixedGate::Tdg => [[ONE, ZERO], [ZERO, phase(-std::f64::consts::FRAC_PI_4)]],
            // Handled as a permutation by the caller.
            FixedGate::Swap => [[ONE, ZERO], [ZERO, ONE]],
        },
    }
}
