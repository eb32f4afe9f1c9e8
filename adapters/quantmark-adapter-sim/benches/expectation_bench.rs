//! Benchmarks for statevector energy evaluation
//!
//! Run with: cargo bench -p quantmark-adapter-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quantmark_adapter_sim::StatevectorBackend;
use quantmark_hal::{Backend, PauliHamiltonian, PauliTerm, Shots};
use quantmark_ir::{Axis, CircuitDescriptor, FixedGate, GateOp, QubitId};

fn ansatz(num_qubits: u32) -> CircuitDescriptor {
    let mut circuit = CircuitDescriptor::new();
    for q in 0..num_qubits {
        circuit.push(GateOp::rotation(Axis::Y, QubitId(q), format!("t{q}")).unwrap());
    }
    for q in 1..num_qubits {
        circuit.push(
            GateOp::fixed(FixedGate::X, vec![QubitId(q)])
                .unwrap()
                .controlled_by([QubitId(q - 1)])
                .unwrap(),
        );
    }
    circuit
}

/// Nearest-neighbour ZZ plus transverse X on every qubit.
fn ising(num_qubits: usize) -> PauliHamiltonian {
    let mut terms = Vec::new();
    for q in 0..num_qubits {
        terms.push(PauliTerm::x(0.5, q));
        if q + 1 < num_qubits {
            terms.push(PauliTerm::zz(1.0, q, q + 1));
        }
    }
    PauliHamiltonian::new(terms)
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_energy");

    for n in [4_u32, 8, 12] {
        let circuit = ansatz(n);
        let params = circuit.bind(vec![0.3; n as usize]).unwrap();
        let h = ising(n as usize);
        group.bench_with_input(BenchmarkId::new("qubits", n), &n, |b, _| {
            let mut backend = StatevectorBackend::new();
            b.iter(|| {
                backend
                    .evaluate(black_box(&circuit), black_box(&params), black_box(&h))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_sampled(c: &mut Criterion) {
    let circuit = ansatz(8);
    let params = circuit.bind(vec![0.3; 8]).unwrap();
    let h = ising(8);
    c.bench_function("sampled_energy_1000_shots", |b| {
        let mut backend = StatevectorBackend::new()
            .with_shots(Shots::Count(1000))
            .with_seed(1);
        b.iter(|| backend.evaluate(&circuit, &params, &h).unwrap());
    });
}

criterion_group!(benches, bench_exact, bench_sampled);
criterion_main!(benches);
