use std::num::IntErrorKind;

use crate::constants::{FALSE_LITERALS, TRUE_LITERALS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceError {
    ExpectedInteger,
    ExpectedUnsigned,
    ExpectedFloat,
    ExpectedBoolean,
    IntegerOverflow,
    UnsignedOverflow,
    FloatOverflow,
}

pub fn parse_signed<T: TryFrom<i64>>(token: &str) -> Result<T, CoerceError> {
    let wide = token.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CoerceError::IntegerOverflow,
        _ => CoerceError::ExpectedInteger,
    })?;
    T::try_from(wide).map_err(|_| CoerceError::IntegerOverflow)
}

pub fn parse_unsigned<T: TryFrom<u64>>(token: &str) -> Result<T, CoerceError> {
    let wide = token.parse::<u64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => CoerceError::UnsignedOverflow,
        _ => CoerceError::ExpectedUnsigned,
    })?;
    T::try_from(wide).map_err(|_| CoerceError::UnsignedOverflow)
}

pub fn parse_f64(token: &str) -> Result<f64, CoerceError> {
    let value = token
        .parse::<f64>()
        .map_err(|_| CoerceError::ExpectedFloat)?;
    // "1e400" parses to infinity; only an explicit infinity literal may.
    if value.is_infinite() && !is_infinity_literal(token) {
        return Err(CoerceError::FloatOverflow);
    }
    Ok(value)
}

pub fn parse_f32(token: &str) -> Result<f32, CoerceError> {
    let value = parse_f64(token)?;
    if value.is_finite() && value.abs() > f64::from(f32::MAX) {
        return Err(CoerceError::FloatOverflow);
    }
    Ok(value as f32)
}

pub fn parse_bool(token: &str) -> Result<bool, CoerceError> {
    let lower = token.to_ascii_lowercase();
    if TRUE_LITERALS.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(CoerceError::ExpectedBoolean)
    }
}

fn is_infinity_literal(token: &str) -> bool {
    let unsigned = token
        .strip_prefix(['+', '-'])
        .unwrap_or(token)
        .to_ascii_lowercase();
    unsigned == "inf" || unsigned == "infinity"
}
