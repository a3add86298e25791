//! Serde helpers for times that may be unbounded.
//!
//! JSON has no infinities, so `±∞` travel as `null`.  On input, `null` or a
//! missing field maps back to the bound the field stands for: `upper` fields
//! (exit times, latest pickup) become `+∞`, `lower` fields (earliest start)
//! become `−∞`.
//!
//! ```ignore
//! #[serde(default = "unbounded::upper_default", with = "unbounded::upper")]
//! pub current_exit_time: f64,
//! ```

use serde::{Deserialize, Deserializer, Serializer};

pub fn upper_default() -> f64 {
    f64::INFINITY
}

pub fn lower_default() -> f64 {
    f64::NEG_INFINITY
}

fn serialize_time<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(value)
    } else {
        serializer.serialize_none()
    }
}

/// `null` ⇔ `+∞`.
pub mod upper {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_time(*value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// `null` ⇔ `−∞`.
pub mod lower {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_time(*value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NEG_INFINITY))
    }
}
