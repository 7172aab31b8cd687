//! String-keyed parameter mappings consumed by the construction factories.
//!
//! A [`Params`] is an insertion-ordered map from dotted keys
//! (`"control.temperature"`) to loosely typed [`ParamValue`]s. It is the
//! only dynamic mapping in the engine: the factories in
//! [`config`](crate::config) decode it into typed structs and everything
//! downstream works with those.

use std::fmt;

use indexmap::IndexMap;

use crate::config::ConfigError;

/// A single configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Floating-point number.
    Float(f64),
    /// Integer.
    Int(i64),
    /// String.
    Str(String),
    /// Boolean.
    Bool(bool),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Insertion-ordered mapping from dotted keys to values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    entries: IndexMap<String, ParamValue>,
}

impl Params {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries under `prefix.`, with the prefix stripped.
    ///
    /// `section("Cell")` on `{"Cell.type": "Cubic", "Cell.length": 10.0}`
    /// yields `{"type": "Cubic", "length": 10.0}`.
    pub fn section(&self, prefix: &str) -> Params {
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .map(|rest| (rest.to_owned(), v.clone()))
            })
            .collect();
        Params { entries }
    }

    /// Consecutive numbered sections `prefix.0`, `prefix.1`, ... up to the
    /// first missing index.
    pub fn indexed_sections(&self, prefix: &str) -> Vec<Params> {
        let mut sections = Vec::new();
        loop {
            let section = self.section(&format!("{prefix}.{}", sections.len()));
            if section.is_empty() {
                return sections;
            }
            sections.push(section);
        }
    }

    /// Optional string value.
    pub fn str(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Str(s)) => Ok(Some(s)),
            Some(other) => Err(wrong_type(key, "string", other)),
        }
    }

    /// Optional number. Integers are widened.
    pub fn f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Float(v)) => Ok(Some(*v)),
            Some(ParamValue::Int(v)) => Ok(Some(*v as f64)),
            Some(other) => Err(wrong_type(key, "number", other)),
        }
    }

    /// Optional non-negative count. Integral floats are accepted.
    pub fn u64(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        let invalid = |value: &ParamValue| ConfigError::InvalidParameter {
            name: key.to_owned(),
            reason: format!("expected a non-negative integer, got {value}"),
        };
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match *value {
            ParamValue::Int(n) => u64::try_from(n).map(Some).map_err(|_| invalid(value)),
            ParamValue::Float(x) => {
                if x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 {
                    Ok(Some(x as u64))
                } else {
                    Err(invalid(value))
                }
            }
            _ => Err(wrong_type(key, "integer", value)),
        }
    }

    /// Required string value.
    pub fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.str(key)?.ok_or_else(|| missing(key))
    }

    /// Required number.
    pub fn require_f64(&self, key: &str) -> Result<f64, ConfigError> {
        self.f64(key)?.ok_or_else(|| missing(key))
    }

    /// Required non-negative count.
    pub fn require_u64(&self, key: &str) -> Result<u64, ConfigError> {
        self.u64(key)?.ok_or_else(|| missing(key))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingParameter {
        name: key.to_owned(),
    }
}

fn wrong_type(key: &str, expected: &'static str, actual: &ParamValue) -> ConfigError {
    ConfigError::WrongType {
        name: key.to_owned(),
        expected,
        actual: actual.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Params {
        Params::new()
            .with("type", "VelocityVerlet")
            .with("timestep", 2.0)
            .with("num_steps", 100i64)
            .with("control.type", "Andersen")
            .with("control.temperature", 300.0)
    }

    // ── Lookup ──────────────────────────────────────────────────

    #[test]
    fn typed_lookups() {
        let p = sample();
        assert_eq!(p.require_str("type").unwrap(), "VelocityVerlet");
        assert_eq!(p.require_f64("timestep").unwrap(), 2.0);
        assert_eq!(p.require_f64("num_steps").unwrap(), 100.0);
        assert_eq!(p.require_u64("num_steps").unwrap(), 100);
        assert_eq!(p.f64("missing").unwrap(), None);
    }

    #[test]
    fn integral_float_counts_accepted() {
        let p = Params::new().with("n", 1e3).with("bad", 2.5).with("neg", -1i64);
        assert_eq!(p.require_u64("n").unwrap(), 1000);
        assert!(matches!(
            p.u64("bad"),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(matches!(
            p.u64("neg"),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn missing_and_mistyped() {
        let p = sample();
        match p.require_f64("length") {
            Err(ConfigError::MissingParameter { name }) => assert_eq!(name, "length"),
            other => panic!("expected MissingParameter, got {other:?}"),
        }
        match p.require_f64("type") {
            Err(ConfigError::WrongType {
                name,
                expected,
                actual,
            }) => {
                assert_eq!(name, "type");
                assert_eq!(expected, "number");
                assert_eq!(actual, "string");
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    // ── Sections ────────────────────────────────────────────────

    #[test]
    fn section_strips_prefix() {
        let control = sample().section("control");
        assert_eq!(control.len(), 2);
        assert_eq!(control.require_str("type").unwrap(), "Andersen");
        assert_eq!(control.require_f64("temperature").unwrap(), 300.0);
        assert!(sample().section("cont").is_empty());
    }

    #[test]
    fn indexed_sections_stop_at_gap() {
        let p: Params = [
            ("Forces.0.type", "LennardJones"),
            ("Forces.1.type", "LennardJones"),
            ("Forces.3.type", "LennardJones"),
        ]
        .into_iter()
        .collect();
        assert_eq!(p.indexed_sections("Forces").len(), 2);
        assert!(p.indexed_sections("Outputs").is_empty());
    }

    proptest! {
        #[test]
        fn section_round_trips_keys(keys in proptest::collection::vec("[a-z]{1,6}", 1..8)) {
            let mut p = Params::new();
            for (i, k) in keys.iter().enumerate() {
                p.insert(format!("S.{k}"), i as i64);
            }
            let s = p.section("S");
            for k in &keys {
                prop_assert!(s.contains(k));
            }
            prop_assert_eq!(s.len(), p.len());
        }
    }
}
