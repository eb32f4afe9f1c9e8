//! Gate vocabulary of the ansatz circuits.
//!
//! Gates come in two families: parameterized gates (axis rotations and the
//! phase gate), which must reference a named variational parameter, and
//! fixed gates, which must not. Any gate may carry control qubits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Lower-case axis letter.
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// Non-parameterized gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedGate {
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    T,
    Tdg,
    Swap,
}

impl FixedGate {
    /// Exact number of targets the gate acts on, if it is not broadcast.
    ///
    /// Single-qubit gates accept any number of targets and are applied to
    /// each target in turn.
    pub fn required_targets(self) -> Option<usize> {
        match self {
            FixedGate::Swap => Some(2),
            _ => None,
        }
    }
}

/// The operation a [`GateOp`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// `exp(-i θ/2 σ)` around the given axis.
    Rotation(Axis),
    /// `diag(1, e^{iθ})`.
    Phase,
    /// A gate with no free parameter.
    Fixed(FixedGate),
}

impl GateKind {
    /// Look a gate up by its textual name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "rx" => GateKind::Rotation(Axis::X),
            "ry" => GateKind::Rotation(Axis::Y),
            "rz" => GateKind::Rotation(Axis::Z),
            "phase" | "p" => GateKind::Phase,
            "h" => GateKind::Fixed(FixedGate::H),
            "x" => GateKind::Fixed(FixedGate::X),
            "y" => GateKind::Fixed(FixedGate::Y),
            "z" => GateKind::Fixed(FixedGate::Z),
            "s" => GateKind::Fixed(FixedGate::S),
            "sdg" => GateKind::Fixed(FixedGate::Sdg),
            "t" => GateKind::Fixed(FixedGate::T),
            "tdg" => GateKind::Fixed(FixedGate::Tdg),
            "swap" => GateKind::Fixed(FixedGate::Swap),
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Rotation(Axis::X) => "Rx",
            GateKind::Rotation(Axis::Y) => "Ry",
            GateKind::Rotation(Axis::Z) => "Rz",
            GateKind::Phase => "Phase",
            GateKind::Fixed(FixedGate::H) => "H",
            GateKind::Fixed(FixedGate::X) => "X",
            GateKind::Fixed(FixedGate::Y) => "Y",
            GateKind::Fixed(FixedGate::Z) => "Z",
            GateKind::Fixed(FixedGate::S) => "S",
            GateKind::Fixed(FixedGate::Sdg) => "Sdg",
            GateKind::Fixed(FixedGate::T) => "T",
            GateKind::Fixed(FixedGate::Tdg) => "Tdg",
            GateKind::Fixed(FixedGate::Swap) => "SWAP",
        }
    }

    /// Whether the gate needs a variational parameter.
    pub fn is_parameterized(self) -> bool {
        matches!(self, GateKind::Rotation(_) | GateKind::Phase)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One gate application in a circuit.
///
/// Deserialization goes through [`GateOp::new`], so a decoded gate obeys
/// the same shape rules as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedGateOp")]
pub struct GateOp {
    kind: GateKind,
    targets: Vec<QubitId>,
    controls: BTreeSet<QubitId>,
    parameter: Option<String>,
}

#[derive(Deserialize)]
struct UncheckedGateOp {
    kind: GateKind,
    targets: Vec<QubitId>,
    #[serde(default)]
    controls: BTreeSet<QubitId>,
    #[serde(default)]
    parameter: Option<String>,
}

impl TryFrom<UncheckedGateOp> for GateOp {
    type Error = IrError;

    fn try_from(raw: UncheckedGateOp) -> IrResult<Self> {
        GateOp::new(raw.kind, raw.targets, raw.controls, raw.parameter)
    }
}

impl GateOp {
    /// Build a gate, checking its shape.
    pub fn new(
        kind: GateKind,
        targets: Vec<QubitId>,
        controls: impl IntoIterator<Item = QubitId>,
        parameter: Option<String>,
    ) -> IrResult<Self> {
        let gate = kind.name().to_string();

        if targets.is_empty() {
            return Err(IrError::NoTargets { gate });
        }
        for (i, q) in targets.iter().enumerate() {
            if targets[..i].contains(q) {
                return Err(IrError::DuplicateTarget { qubit: *q, gate });
            }
        }
        if let GateKind::Fixed(fixed) = kind {
            if let Some(expected) = fixed.required_targets() {
                if targets.len() != expected {
                    return Err(IrError::TargetCountMismatch {
                        gate,
                        expected,
                        got: targets.len(),
                    });
                }
            }
        }

        let controls: BTreeSet<QubitId> = controls.into_iter().collect();
        if let Some(q) = controls.iter().find(|c| targets.contains(c)) {
            return Err(IrError::ControlIsTarget { qubit: *q, gate });
        }

        match (kind.is_parameterized(), parameter) {
            (true, None) => Err(IrError::MissingParameter(gate)),
            (false, Some(parameter)) => Err(IrError::UnexpectedParameter { gate, parameter }),
            (_, Some(p)) if !is_valid_parameter_name(&p) => Err(IrError::InvalidParameterName(p)),
            (_, parameter) => Ok(Self {
                kind,
                targets,
                controls,
                parameter,
            }),
        }
    }

    /// Parameterized rotation on a single target.
    pub fn rotation(axis: Axis, target: QubitId, parameter: impl Into<String>) -> IrResult<Self> {
        Self::new(
            GateKind::Rotation(axis),
            vec![target],
            [],
            Some(parameter.into()),
        )
    }

    /// Fixed gate on the given targets.
    pub fn fixed(gate: FixedGate, targets: Vec<QubitId>) -> IrResult<Self> {
        Self::new(GateKind::Fixed(gate), targets, [], None)
    }

    /// Add control qubits to an existing gate.
    pub fn controlled_by(self, controls: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let mut all = self.controls;
        all.extend(controls);
        Self::new(self.kind, self.targets, all, self.parameter)
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    pub fn controls(&self) -> &BTreeSet<QubitId> {
        &self.controls
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Every qubit the gate touches, targets first.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.targets.iter().chain(self.controls.iter()).copied()
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(target=(", self.kind)?;
        write_tuple(f, self.targets.iter())?;
        write!(f, ")")?;
        if !self.controls.is_empty() {
            write!(f, ", control=(")?;
            write_tuple(f, self.controls.iter())?;
            write!(f, ")")?;
        }
        if let Some(p) = &self.parameter {
            write!(f, ", parameter={p}")?;
        }
        write!(f, ")")
    }
}

fn write_tuple<'a>(
    f: &mut fmt::Formatter<'_>,
    qubits: impl Iterator<Item = &'a QubitId>,
) -> fmt::Result {
    let mut n = 0;
    for q in qubits {
        if n > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", q.0)?;
        n += 1;
    }
    if n == 1 {
        write!(f, ",")?;
    }
    Ok(())
}

/// Identifier rule shared with the text front-end: a letter or underscore
/// followed by letters, digits or underscores.
pub fn is_valid_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(GateKind::from_name("Ry"), Some(GateKind::Rotation(Axis::Y)));
        assert_eq!(GateKind::from_name("RY"), Some(GateKind::Rotation(Axis::Y)));
        assert_eq!(GateKind::from_name("swap"), Some(GateKind::Fixed(FixedGate::Swap)));
        assert_eq!(GateKind::from_name("cnot"), None);
    }

    #[test]
    fn test_rotation_requires_parameter() {
        let err = GateOp::new(GateKind::Rotation(Axis::X), vec![QubitId(0)], [], None);
        assert!(matches!(err, Err(IrError::MissingParameter(_))));
    }

    #[test]
    fn test_fixed_gate_rejects_parameter() {
        let err = GateOp::new(
            GateKind::Fixed(FixedGate::H),
            vec![QubitId(0)],
            [],
            Some("a".into()),
        );
        assert!(matches!(err, Err(IrError::UnexpectedParameter { .. })));
    }

    #[test]
    fn test_control_overlapping_target() {
        let err = GateOp::new(
            GateKind::Fixed(FixedGate::X),
            vec![QubitId(1)],
            [QubitId(1)],
            None,
        );
        assert!(matches!(err, Err(IrError::ControlIsTarget { .. })));
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let cx = GateOp::fixed(FixedGate::X, vec![QubitId(1)])
            .unwrap()
            .controlled_by([QubitId(0)])
            .unwrap();
        let json = serde_json::to_value(&cx).unwrap();
        assert_eq!(serde_json::from_value::<GateOp>(json.clone()).unwrap(), cx);

        let mut overlapping = json.clone();
        overlapping["controls"] = serde_json::json!([1]);
        let err = serde_json::from_value::<GateOp>(overlapping).unwrap_err();
        assert!(err.to_string().contains("control"), "{err}");

        let ry = GateOp::rotation(Axis::Y, QubitId(0), "a").unwrap();
        let mut unnamed = serde_json::to_value(ry).unwrap();
        unnamed["parameter"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<GateOp>(unnamed).is_err());
    }

    #[test]
    fn test_duplicate_target() {
        let err = GateOp::fixed(FixedGate::H, vec![QubitId(2), QubitId(2)]);
        assert!(matches!(err, Err(IrError::DuplicateTarget { .. })));
    }

    #[test]
    fn test_swap_arity() {
        assert!(GateOp::fixed(FixedGate::Swap, vec![QubitId(0), QubitId(1)]).is_ok());
        let err = GateOp::fixed(FixedGate::Swap, vec![QubitId(0)]);
        assert!(matches!(
            err,
            Err(IrError::TargetCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_display_round_trips_grammar() {
        let op = GateOp::fixed(FixedGate::X, vec![QubitId(1)])
            .unwrap()
            .controlled_by([QubitId(0)])
            .unwrap();
        assert_eq!(op.to_string(), "X(target=(1,), control=(0,))");

        let ry = GateOp::rotation(Axis::Y, QubitId(3), "theta_1").unwrap();
        assert_eq!(ry.to_string(), "Ry(target=(3,), parameter=theta_1)");
    }

    #[test]
    fn test_parameter_names() {
        assert!(is_valid_parameter_name("a"));
        assert!(is_valid_parameter_name("_t0"));
        assert!(!is_valid_parameter_name("0a"));
        assert!(!is_valid_parameter_name(""));
        assert!(!is_valid_parameter_name("a-b"));
    }
}
