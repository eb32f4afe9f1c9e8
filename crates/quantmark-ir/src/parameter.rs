//! Ordered parameter bindings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Ordered mapping from parameter name to value.
///
/// The order is the order in which names first appear in the circuit, so
/// two vectors built for the same circuit line up element by element and
/// optimizers can treat the values as a plain `&[f64]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl ParameterVector {
    /// Bind `values` to `names` position by position.
    pub fn new(names: Vec<String>, values: Vec<f64>) -> IrResult<Self> {
        if names.len() != values.len() {
            return Err(IrError::ParameterCountMismatch {
                expected: names.len(),
                got: values.len(),
            });
        }
        Ok(Self { names, values })
    }

    /// All parameters set to zero.
    pub fn zeros(names: Vec<String>) -> Self {
        let values = vec![0.0; names.len()];
        Self { names, values }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Same names, new values.
    pub fn with_values(&self, values: Vec<f64>) -> IrResult<Self> {
        Self::new(self.names.clone(), values)
    }

    /// Overwrite the values in place.
    pub fn set_values(&mut self, values: &[f64]) -> IrResult<()> {
        if values.len() != self.values.len() {
            return Err(IrError::ParameterCountMismatch {
                expected: self.values.len(),
                got: values.len(),
            });
        }
        self.values.copy_from_slice(values);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// True when every value is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl fmt::Display for ParameterVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value:.6}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_order() {
        let p = ParameterVector::new(vec!["b".into(), "a".into()], vec![1.0, 2.0]).unwrap();
        assert_eq!(p.get("a"), Some(2.0));
        assert_eq!(p.get("c"), None);
        assert_eq!(p.names(), &["b".to_string(), "a".to_string()]);
        assert_eq!(p.to_string(), "{b: 1.000000, a: 2.000000}");
    }

    #[test]
    fn test_length_mismatch() {
        let err = ParameterVector::new(vec!["a".into()], vec![]);
        assert!(matches!(
            err,
            Err(IrError::ParameterCountMismatch { expected: 1, got: 0 })
        ));

        let mut p = ParameterVector::zeros(vec!["a".into(), "b".into()]);
        assert!(p.set_values(&[1.0]).is_err());
        p.set_values(&[1.0, f64::NAN]).unwrap();
        assert!(!p.is_finite());
    }
}
