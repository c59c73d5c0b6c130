pub mod analysis;
pub mod enums;
pub mod history;
pub mod medication;
pub mod profile;
pub mod symptom;

pub use analysis::*;
pub use enums::*;
pub use history::*;
pub use medication::*;
pub use profile::*;
pub use symptom::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Serde helpers for blobs written by forms, where unset optional
/// fields are stored as empty strings and numbers may arrive as floats.
pub(crate) mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    /// `null`, missing, or blank strings load as `None`. Anything else is
    /// parsed as written; padding is only dropped if the padded form fails.
    pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => trimmed.parse().map(Some).map_err(D::Error::custom),
        }
    }

    /// Write-side counterpart of [`blank_as_none`]: blank text becomes `None`.
    pub fn clear_blank(field: &mut Option<String>) {
        if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *field = None;
        }
    }

    /// Any JSON number, rounded and floored at zero.
    pub fn non_negative<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(D::Error::custom("expected a finite number"));
        }
        Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
    }
}
