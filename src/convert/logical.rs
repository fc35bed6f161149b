//! Logical-type converters
//!
//! Each converter maps the accepted input shapes onto the exact numeric
//! or byte representation the logical type's binary encoding requires:
//! day counts for dates, sub-midnight units for times, epoch units for
//! timestamps, unscaled big-integer bytes for decimals. Shapes with no
//! rule are unsupported; no numeric reinterpretation ever happens (an
//! int offered to a date field is an error, not a day count).

use apache_avro::types::Value;
use apache_avro::Decimal;
use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use num_bigint::BigInt;
use tracing::debug;
use uuid::Uuid;

use super::config::RescalePolicy;
use super::errors::{CoercionError, ConvertResult};
use crate::schema::LogicalType;
use crate::value::InputValue;

/// Dispatches to the converter matching the logical-type tag.
///
/// The table is a static, exhaustive match: adding a logical type to
/// [`LogicalType`] forces a conversion rule here.
pub(crate) fn convert_logical(
    raw: &InputValue,
    logical: LogicalType,
    rescale: RescalePolicy,
    path: &str,
) -> ConvertResult<Value> {
    match logical {
        LogicalType::Date => to_date(raw, path),
        LogicalType::TimeMillis => to_time_millis(raw, path),
        LogicalType::TimeMicros => to_time_micros(raw, path),
        LogicalType::TimestampMillis => to_timestamp_millis(raw, path),
        LogicalType::TimestampMicros => to_timestamp_micros(raw, path),
        LogicalType::LocalTimestampMillis => to_local_timestamp_millis(raw, path),
        LogicalType::LocalTimestampMicros => to_local_timestamp_micros(raw, path),
        LogicalType::Decimal { precision, scale } => {
            to_decimal(raw, precision, scale, rescale, path)
        }
        LogicalType::Uuid => to_uuid(raw, path),
    }
}

/// date: calendar date or strict ISO-8601 date string, no time component
fn to_date(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    let date = match raw {
        InputValue::Date(d) => *d,
        InputValue::String(s) => s.parse::<NaiveDate>().map_err(|e| {
            CoercionError::parse_failure(path, "date", s.clone(), e.to_string())
        })?,
        other => return Err(CoercionError::unsupported(path, "date", other)),
    };

    // NaiveDate::default() is the Unix epoch.
    let days = date.signed_duration_since(NaiveDate::default()).num_days();
    let days = i32::try_from(days).map_err(|_| {
        CoercionError::parse_failure(
            path,
            "date",
            date.to_string(),
            "day count out of range for a 32-bit integer",
        )
    })?;
    Ok(Value::Date(days))
}

/// time-millis: milliseconds since midnight, sub-millisecond floor
fn to_time_millis(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Time(t) => {
            let millis = t.num_seconds_from_midnight() * 1_000 + t.nanosecond() / 1_000_000;
            Ok(Value::TimeMillis(millis as i32))
        }
        other => Err(CoercionError::unsupported(path, "time-millis", other)),
    }
}

/// time-micros: microseconds since midnight, sub-microsecond floor
fn to_time_micros(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Time(t) => {
            let micros = i64::from(t.num_seconds_from_midnight()) * 1_000_000
                + i64::from(t.nanosecond() / 1_000);
            Ok(Value::TimeMicros(micros))
        }
        other => Err(CoercionError::unsupported(path, "time-micros", other)),
    }
}

/// timestamp-millis: epoch milliseconds of an instant
fn to_timestamp_millis(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Instant(dt) => Ok(Value::TimestampMillis(dt.timestamp_millis())),
        InputValue::OffsetDateTime(dt) => Ok(Value::TimestampMillis(
            dt.with_timezone(&Utc).timestamp_millis(),
        )),
        other => Err(CoercionError::unsupported(path, "timestamp-millis", other)),
    }
}

/// timestamp-micros: epoch microseconds of an instant
fn to_timestamp_micros(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::Instant(dt) => Ok(Value::TimestampMicros(instant_micros(dt))),
        InputValue::OffsetDateTime(dt) => Ok(Value::TimestampMicros(instant_micros(
            &dt.with_timezone(&Utc),
        ))),
        other => Err(CoercionError::unsupported(path, "timestamp-micros", other)),
    }
}

/// local-timestamp-millis: offset-less date-time anchored to UTC
fn to_local_timestamp_millis(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::LocalDateTime(ldt) => Ok(Value::LocalTimestampMillis(
            ldt.and_utc().timestamp_millis(),
        )),
        other => Err(CoercionError::unsupported(
            path,
            "local-timestamp-millis",
            other,
        )),
    }
}

/// local-timestamp-micros: offset-less date-time anchored to UTC
fn to_local_timestamp_micros(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    match raw {
        InputValue::LocalDateTime(ldt) => Ok(Value::LocalTimestampMicros(instant_micros(
            &ldt.and_utc(),
        ))),
        other => Err(CoercionError::unsupported(
            path,
            "local-timestamp-micros",
            other,
        )),
    }
}

/// Epoch microseconds from whole seconds plus sub-second micros.
///
/// Never `timestamp_millis() * 1_000`: that drops the sub-millisecond
/// component.
fn instant_micros(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp() * 1_000_000 + i64::from(dt.timestamp_subsec_micros())
}

/// decimal(precision, scale): unscaled integer bytes at the declared scale
fn to_decimal(
    raw: &InputValue,
    precision: usize,
    scale: usize,
    policy: RescalePolicy,
    path: &str,
) -> ConvertResult<Value> {
    let decimal = match raw {
        InputValue::Decimal(d) => d.clone(),
        InputValue::String(s) => s.parse::<BigDecimal>().map_err(|e| {
            CoercionError::parse_failure(path, "decimal", s.clone(), e.to_string())
        })?,
        other => return Err(CoercionError::unsupported(path, "decimal", other)),
    };

    let unscaled = rescale_to(&decimal, scale, policy, path)?;

    let digits = {
        let s = unscaled.to_string();
        s.strip_prefix('-').map_or(s.len(), str::len)
    };
    if digits > precision {
        return Err(CoercionError::parse_failure(
            path,
            "decimal",
            decimal.to_string(),
            format!("requires {digits} digits, declared precision is {precision}"),
        ));
    }

    Ok(Value::Decimal(Decimal::from(
        unscaled.to_signed_bytes_be(),
    )))
}

/// Adjusts a decimal's unscaled integer to exactly `target` fractional
/// digits. Widening is always exact; narrowing follows the policy.
fn rescale_to(
    value: &BigDecimal,
    target: usize,
    policy: RescalePolicy,
    path: &str,
) -> ConvertResult<BigInt> {
    let target_exp = target as i64;
    let (unscaled, exponent) = value.as_bigint_and_exponent();

    if exponent == target_exp {
        return Ok(unscaled);
    }

    if exponent < target_exp {
        let shift = shift_amount(target_exp - exponent, value, path)?;
        return Ok(unscaled * BigInt::from(10).pow(shift));
    }

    match policy {
        RescalePolicy::Reject => {
            let shift = shift_amount(exponent - target_exp, value, path)?;
            let divisor = BigInt::from(10).pow(shift);
            let quotient = &unscaled / &divisor;
            let remainder = &unscaled % &divisor;
            if remainder != BigInt::from(0) {
                return Err(CoercionError::RescaleLoss {
                    path: path.to_string(),
                    value: value.to_string(),
                    scale: target,
                });
            }
            Ok(quotient)
        }
        RescalePolicy::Round => {
            let rounded = value.with_scale_round(target_exp, RoundingMode::HalfUp);
            if rounded != *value {
                debug!(field = path, scale = target, "decimal rounded during rescale");
            }
            let (unscaled, _) = rounded.as_bigint_and_exponent();
            Ok(unscaled)
        }
    }
}

fn shift_amount(diff: i64, value: &BigDecimal, path: &str) -> ConvertResult<u32> {
    u32::try_from(diff).map_err(|_| {
        CoercionError::parse_failure(
            path,
            "decimal",
            value.to_string(),
            "scale adjustment out of range",
        )
    })
}

/// uuid: canonical string form, round-tripped through a parse
fn to_uuid(raw: &InputValue, path: &str) -> ConvertResult<Value> {
    let text = raw
        .canonical_string()
        .ok_or_else(|| CoercionError::unsupported(path, "uuid", raw))?;
    Uuid::parse_str(&text).map(Value::Uuid).map_err(|e| {
        CoercionError::parse_failure(path, "uuid", text.clone(), e.to_string())
    })
}
