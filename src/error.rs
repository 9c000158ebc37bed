//! Error taxonomy shared by devices, sources, the engine, and the device store.

use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// Every variant is recoverable by the caller: a rejected call leaves all
/// prior state unchanged.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid {field} = {value}: {reason}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("device name \"{0}\" is already registered")]
    DuplicateIdentifier(String),

    #[error("unknown device type \"{0}\"")]
    UnknownDeviceType(String),

    #[error("no device named \"{0}\"")]
    UnknownDevice(String),

    #[error("no renewable source with id {0}")]
    UnknownSource(usize),

    #[error("{operation} is not supported by {device} ({device_type})")]
    UnsupportedOperation {
        device: String,
        device_type: &'static str,
        operation: &'static str,
    },

    #[error("{operation} is not supported by {name} ({source_type})")]
    UnsupportedSourceOperation {
        name: String,
        source_type: &'static str,
        operation: &'static str,
    },

    #[error("device store: {0}")]
    Store(#[from] csv::Error),

    #[error("device store I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;

impl SimError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidArgument {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns `true` for argument validation failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::invalid(field, value, "must be finite"))
    }
}

/// Rejects negative and non-finite values.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(SimError::invalid(field, value, "must be >= 0"));
    }
    Ok(value)
}

/// Rejects values outside `[0, 1]`.
pub(crate) fn ensure_fraction(field: &'static str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::invalid(field, value, "must be in [0, 1]"));
    }
    Ok(value)
}
