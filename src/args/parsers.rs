use std::time::Duration;

use super::types::PositiveUsize;
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

/// Parses `<number>[ms|s|m|h]`; a bare number means seconds.
///
/// # Errors
///
/// Returns a validation error for empty, malformed, zero or overflowing values.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let secs_per_unit: u64 = match unit_part.trim() {
        "ms" => {
            return non_zero(Duration::from_millis(number));
        }
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        unit => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    };
    let secs = number
        .checked_mul(secs_per_unit)
        .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
    non_zero(Duration::from_secs(secs))
}

fn non_zero(duration: Duration) -> AppResult<Duration> {
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}
