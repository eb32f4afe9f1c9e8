//! Ansatz circuit descriptor and gate scheduling.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::GateOp;
use crate::parameter::ParameterVector;
use crate::qubit::QubitId;

/// An ordered list of gate applications.
///
/// The descriptor is purely structural: it names parameters but never holds
/// their values. Values are supplied per evaluation as a [`ParameterVector`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircuitDescriptor {
    gates: Vec<GateOp>,
}

impl CircuitDescriptor {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a circuit from already validated gates.
    pub fn from_gates(gates: Vec<GateOp>) -> Self {
        Self { gates }
    }

    /// Append a gate.
    pub fn push(&mut self, gate: GateOp) -> &mut Self {
        self.gates.push(gate);
        self
    }

    pub fn gates(&self) -> &[GateOp] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// One more than the largest qubit index referenced, or 0 when empty.
    pub fn qubit_count(&self) -> usize {
        self.gates
            .iter()
            .flat_map(GateOp::qubits)
            .map(|q| q.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Greedy as-soon-as-possible layer of every gate, in circuit order.
    ///
    /// Each gate lands one layer after the latest layer occupied by any of
    /// its qubits (targets and controls).
    fn schedule(&self) -> Vec<usize> {
        let mut last: FxHashMap<QubitId, usize> = FxHashMap::default();
        self.gates
            .iter()
            .map(|gate| {
                let layer = gate
                    .qubits()
                    .filter_map(|q| last.get(&q).map(|l| l + 1))
                    .max()
                    .unwrap_or(0);
                for q in gate.qubits() {
                    last.insert(q, layer);
                }
                layer
            })
            .collect()
    }

    /// Gate indices per layer of the ASAP schedule, in circuit order
    /// within a layer.
    pub fn layers(&self) -> Vec<Vec<usize>> {
        let schedule = self.schedule();
        let mut layers: Vec<Vec<usize>> = Vec::new();
        for (idx, layer) in schedule.into_iter().enumerate() {
            if layer == layers.len() {
                layers.push(Vec::new());
            }
            layers[layer].push(idx);
        }
        layers
    }

    /// Number of layers in the ASAP schedule.
    pub fn gate_depth(&self) -> usize {
        self.schedule().into_iter().max().map_or(0, |layer| layer + 1)
    }

    /// Distinct parameter names in order of first appearance.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        self.gates
            .iter()
            .filter_map(GateOp::parameter)
            .filter(|p| seen.insert(*p))
            .map(str::to_string)
            .collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.parameter_names().len()
    }

    /// Zero-valued parameter vector laid out for this circuit.
    pub fn zero_parameters(&self) -> ParameterVector {
        ParameterVector::zeros(self.parameter_names())
    }

    /// Bind values positionally, in [`parameter_names`](Self::parameter_names) order.
    pub fn bind(&self, values: Vec<f64>) -> IrResult<ParameterVector> {
        ParameterVector::new(self.parameter_names(), values)
    }

    /// Check that every referenced parameter has a value.
    pub fn check_bound(&self, parameters: &ParameterVector) -> IrResult<()> {
        for gate in &self.gates {
            if let Some(name) = gate.parameter() {
                if parameters.get(name).is_none() {
                    return Err(IrError::UnboundParameter(name.to_string()));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for CircuitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "circuit:")?;
        for gate in &self.gates {
            writeln!(f, "{gate}")?;
        }
        Ok(())
    }
}

impl FromIterator<GateOp> for CircuitDescriptor {
    fn from_iter<I: IntoIterator<Item = GateOp>>(iter: I) -> Self {
        Self::from_gates(iter.into_iter().collect())
    }
}
