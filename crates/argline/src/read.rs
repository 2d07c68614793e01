//! Conversion of captured text into typed values.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("value is empty")]
    Empty,
    #[error("cannot read '{text}' as {target}: {reason}")]
    Convert {
        text: String,
        target: &'static str,
        reason: String,
    },
}

/// Convert the value's current text (bound or default) into `T`.
pub fn read<T>(value: &Value) -> Result<T, ReadError>
where
    T: FromStr,
    T::Err: Display,
{
    if value.is_empty() {
        return Err(ReadError::Empty);
    }
    value.text().parse().map_err(|e: T::Err| ReadError::Convert {
        text: value.text().to_string(),
        target: std::any::type_name::<T>(),
        reason: e.to_string(),
    })
}

/// Like [`read`], falling back to `default` on any failure.
pub fn read_or<T>(default: T, value: &Value) -> T
where
    T: FromStr,
    T::Err: Display,
{
    read(value).unwrap_or(default)
}
