//! Properties of statevector energies.

use proptest::prelude::*;
use quantmark_adapter_sim::StatevectorBackend;
use quantmark_hal::{Backend, Pauli, PauliHamiltonian, PauliTerm, Shots};
use quantmark_parse::parse_circuit;

const ANSATZ: &str = "circuit:
Ry(target=(0,), parameter=a)
Ry(target=(1,), parameter=b)
X(target=(1,), control=(0,))
Rz(target=(0, 1), parameter=c)
";

fn arb_pauli() -> impl Strategy<Value = Pauli> {
    prop_oneof![Just(Pauli::X), Just(Pauli::Y), Just(Pauli::Z)]
}

fn arb_term() -> impl Strategy<Value = PauliTerm> {
    (-2.0_f64..2.0, arb_pauli(), arb_pauli(), any::<bool>()).prop_map(|(c, p0, p1, two)| {
        let mut ops = vec![(0, p0)];
        if two {
            ops.push((1, p1));
        }
        PauliTerm::new(c, ops)
    })
}

fn arb_hamiltonian() -> impl Strategy<Value = PauliHamiltonian> {
    prop::collection::vec(arb_term(), 1..6).prop_map(PauliHamiltonian::new)
}

proptest! {
    #[test]
    fn test_energy_bounded_by_coefficients(
        h in arb_hamiltonian(),
        angles in prop::collection::vec(-3.2_f64..3.2, 3),
    ) {
        let circuit = parse_circuit(ANSATZ).unwrap();
        let params = circuit.bind(angles).unwrap();
        let bound: f64 = h.terms.iter().map(|t| t.coefficient.abs()).sum();

        let energy = StatevectorBackend::new().evaluate(&circuit, &params, &h).unwrap();
        prop_assert!(energy.is_finite());
        prop_assert!(energy.abs() <= bound + 1e-9);
    }

    #[test]
    fn test_sampled_energy_within_shot_bound(
        h in arb_hamiltonian(),
        angles in prop::collection::vec(-3.2_f64..3.2, 3),
        seed in any::<u64>(),
    ) {
        let circuit = parse_circuit(ANSATZ).unwrap();
        let params = circuit.bind(angles).unwrap();
        let bound: f64 = h.terms.iter().map(|t| t.coefficient.abs()).sum();

        let mut backend = StatevectorBackend::new()
            .with_shots(Shots::Count(64))
            .with_seed(seed);
        let energy = backend.evaluate(&circuit, &params, &h).unwrap();
        prop_assert!(energy.abs() <= bound + 1e-9);
    }
}

#[test]
fn test_identity_only_hamiltonian_is_exact_under_sampling() {
    let circuit = parse_circuit(ANSATZ).unwrap();
    let params = circuit.bind(vec![0.1, 0.2, 0.3]).unwrap();
    let h = PauliHamiltonian::new(vec![PauliTerm::identity(-1.25)]);

    let mut backend = StatevectorBackend::new().with_shots(Shots::Count(10));
    assert_eq!(backend.evaluate(&circuit, &params, &h).unwrap(), -1.25);
}
