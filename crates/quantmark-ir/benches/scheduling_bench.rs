//! Benchmarks for circuit scheduling
//!
//! Run with: cargo bench -p quantmark-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quantmark_ir::{Axis, CircuitDescriptor, FixedGate, GateOp, QubitId};

/// Hardware-efficient ansatz: Ry layer then a CX ladder, repeated.
fn ansatz(num_qubits: u32, reps: usize) -> CircuitDescriptor {
    let mut circuit = CircuitDescriptor::new();
    for r in 0..reps {
        for q in 0..num_qubits {
            circuit.push(GateOp::rotation(Axis::Y, QubitId(q), format!("t{r}_{q}")).unwrap());
        }
        for q in 1..num_qubits {
            circuit.push(
                GateOp::fixed(FixedGate::X, vec![QubitId(q)])
                    .unwrap()
                    .controlled_by([QubitId(q - 1)])
                    .unwrap(),
            );
        }
    }
    circuit
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_depth");

    for num_qubits in &[4_u32, 8, 16] {
        let circuit = ansatz(*num_qubits, 10);
        group.bench_with_input(
            BenchmarkId::new("ansatz", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit).gate_depth());
            },
        );
    }

    group.finish();
}

fn bench_parameter_names(c: &mut Criterion) {
    let circuit = ansatz(8, 10);
    c.bench_function("parameter_names", |b| {
        b.iter(|| black_box(&circuit).parameter_names());
    });
}

criterion_group!(benches, bench_depth, bench_parameter_names);
criterion_main!(benches);
