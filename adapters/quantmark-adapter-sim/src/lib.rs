//! quantmark Local Statevector Backend
//!
//! Reference [`Backend`](quantmark_hal::Backend) for running benchmarks
//! end to end without external services. The ansatz is simulated as a full
//! statevector and the energy is either computed exactly or estimated from
//! finite samples per Pauli term.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```rust
//! use quantmark_adapter_sim::StatevectorBackend;
//! use quantmark_hal::{Backend, PauliHamiltonian, PauliTerm};
//! use quantmark_parse::parse_circuit;
//!
//! let circuit = parse_circuit("Ry(target=(0,), parameter=a)").unwrap();
//! let params = circuit.bind(vec![std::f64::consts::PI]).unwrap();
//! let h = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)]);
//!
//! let mut backend = StatevectorBackend::new();
//! let energy = backend.evaluate(&circuit, &params, &h).unwrap();
//! assert!((energy + 1.0).abs() < 1e-12);
//! ```

mod simulator;
mod statevector;

pub use simulator::{BACKEND_NAME, MAX_QUBITS, StatevectorBackend, register};
pub use statevector::Statevector;
