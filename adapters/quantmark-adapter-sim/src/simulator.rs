//! Statevector backend implementation.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use quantmark_hal::{
    Backend, BackendConfig, BackendRegistry, HalError, HalResult, Pauli, PauliHamiltonian,
    PauliTerm, Shots,
};
use quantmark_ir::{CircuitDescriptor, ParameterVector};

use crate::statevector::Statevector;

/// Largest register the backend will allocate.
pub const MAX_QUBITS: usize = 20;

/// Name under which the backend registers.
pub const BACKEND_NAME: &str = "statevector";

/// Local statevector backend.
///
/// With [`Shots::Exact`] every expectation value is computed exactly. With
/// [`Shots::Count`] each non-identity Pauli term is estimated from that many
/// samples in its own measurement basis.
pub struct StatevectorBackend {
    shots: Shots,
    max_qubits: usize,
    rng: SmallRng,
}

impl StatevectorBackend {
    /// Exact backend with the default qubit limit.
    pub fn new() -> Self {
        Self {
            shots: Shots::Exact,
            max_qubits: MAX_QUBITS,
            rng: SmallRng::seed_from_u64(0),
        }
    }

    pub fn with_shots(mut self, shots: Shots) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Build the backend owned by `repetition` from a configuration.
    ///
    /// Recognized option: `max_qubits` (at most [`MAX_QUBITS`]).
    pub fn from_config(config: &BackendConfig, repetition: usize) -> HalResult<Self> {
        let max_qubits = match config.option_u64("max_qubits")? {
            None => MAX_QUBITS,
            Some(n) if (1..=MAX_QUBITS as u64).contains(&n) => n as usize,
            Some(n) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits must be between 1 and {MAX_QUBITS}, got {n}"
                )));
            }
        };
        if let Some(unknown) = config.options.keys().find(|k| k.as_str() != "max_qubits") {
            return Err(HalError::Configuration(format!(
                "unknown statevector option '{unknown}'"
            )));
        }

        Ok(Self {
            shots: config.shots,
            max_qubits,
            rng: SmallRng::seed_from_u64(config.seed_for(repetition)),
        })
    }

    /// Prepare |ψ(θ)⟩ on `num_qubits` qubits.
    fn prepare(
        &self,
        circuit: &CircuitDescriptor,
        parameters: &ParameterVector,
        num_qubits: usize,
    ) -> Statevector {
        let mut state = Statevector::new(num_qubits);
        for gate in circuit.gates() {
            state.apply(gate, parameters);
        }
        state
    }

    fn sampled_expectation(
        &mut self,
        state: &Statevector,
        hamiltonian: &PauliHamiltonian,
        shots: u32,
    ) -> f64 {
        // Cumulative distributions keyed by measurement basis (X mask, Y mask).
        let mut bases: FxHashMap<(usize, usize), Vec<f64>> = FxHashMap::default();
        let mut energy = hamiltonian.identity_coefficient();

        for term in hamiltonian.non_identity_terms() {
            let key = (term.mask_of(Pauli::X), term.mask_of(Pauli::Y));
            let cdf = bases.entry(key).or_insert_with(|| basis_cdf(state, term));
            let support = term.mask_of(Pauli::X) | term.mask_of(Pauli::Y) | term.mask_of(Pauli::Z);

            let mut sum = 0i64;
            for _ in 0..shots {
                let outcome = sample(cdf, self.rng.gen_range(0.0..1.0));
                sum += if (outcome & support).count_ones() % 2 == 0 {
                    1
                } else {
                    -1
                };
            }
            energy += term.coefficient * sum as f64 / f64::from(shots);
        }

        energy
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StatevectorBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn max_qubits(&self) -> Option<usize> {
        Some(self.max_qubits)
    }

    fn evaluate(
        &mut self,
        circuit: &CircuitDescriptor,
        parameters: &ParameterVector,
        hamiltonian: &PauliHamiltonian,
    ) -> HalResult<f64> {
        circuit.check_bound(parameters)?;
        hamiltonian.validate()?;

        let num_qubits = circuit.qubit_count().max(hamiltonian.num_qubits());
        if num_qubits > self.max_qubits {
            return Err(HalError::CircuitTooLarge {
                qubits: num_qubits,
                max: self.max_qubits,
            });
        }

        let state = self.prepare(circuit, parameters, num_qubits);
        let energy = match self.shots {
            Shots::Exact => hamiltonian
                .terms
                .iter()
                .map(|t| t.coefficient * state.pauli_expectation(t))
                .sum(),
            Shots::Count(n) => self.sampled_expectation(&state, hamiltonian, n),
        };

        trace!(num_qubits, energy, "statevector evaluation");
        Ok(energy)
    }
}

/// CDF of the outcomes after rotating `term`'s X/Y qubits into the Z basis.
fn basis_cdf(state: &Statevector, term: &PauliTerm) -> Vec<f64> {
    let mut rotated = state.clone();
    rotated.rotate_to_z_basis(term);
    let mut acc = 0.0;
    rotated
        .probabilities()
        .into_iter()
        .map(|p| {
            acc += p;
            acc
        })
        .collect()
}

fn sample(cdf: &[f64], r: f64) -> usize {
    let total = cdf.last().copied().unwrap_or(1.0);
    let target = r * total;
    cdf.partition_point(|&c| c <= target)
        .min(cdf.len().saturating_sub(1))
}

/// Register the statevector backend and its aliases.
pub fn register(registry: &mut BackendRegistry) {
    registry.register(
        BACKEND_NAME,
        format!("local statevector simulator (exact or sampled, up to {MAX_QUBITS} qubits)"),
        |config, repetition| {
            let backend = StatevectorBackend::from_config(config, repetition)?;
            debug!(repetition, shots = %config.shots, "created statevector backend");
            Ok(Box::new(backend) as Box<dyn Backend>)
        },
    );
    for alias in ["qulacs", "qiskit", "simulator"] {
        registry.alias(alias, BACKEND_NAME);
    }
}
