//! Scalar coercions shared by the validators
//!
//! Each function takes a raw value and either produces the normalized form
//! or a human-readable message describing what was expected. Paths are
//! attached by the schema layer.

use crate::value::ConfigValue;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const TRUE_TOKENS: [&str; 4] = ["true", "yes", "on", "enable"];
const FALSE_TOKENS: [&str; 4] = ["false", "no", "off", "disable"];

static DURATION_RE: OnceLock<Regex> = OnceLock::new();
static TEMPERATURE_RE: OnceLock<Regex> = OnceLock::new();

fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(r"(?i)^([0-9]+(?:\.[0-9]+)?)\s*(us|ms|s|sec|min|h|d)$")
            .expect("duration pattern is valid")
    })
}

fn temperature_re() -> &'static Regex {
    TEMPERATURE_RE.get_or_init(|| {
        Regex::new(r"(?i)^(-?[0-9]+(?:\.[0-9]+)?)\s*(°?[cf])?$")
            .expect("temperature pattern is valid")
    })
}

pub fn boolean(value: &ConfigValue) -> Result<bool, String> {
    match value {
        ConfigValue::Bool(b) => Ok(*b),
        ConfigValue::Str(s) => {
            let token = s.trim();
            if TRUE_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)) {
                Ok(true)
            } else if FALSE_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)) {
                Ok(false)
            } else {
                Err(format!(
                    "expected boolean value, got '{}' (use true/yes/on/enable or false/no/off/disable)",
                    s
                ))
            }
        }
        other => Err(format!("expected boolean value, got {}", other.type_name())),
    }
}

pub fn integer(value: &ConfigValue) -> Result<i64, String> {
    match value {
        ConfigValue::Int(i) => Ok(*i),
        ConfigValue::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        ConfigValue::Float(f) => Err(format!("expected integer, got fractional number {}", f)),
        ConfigValue::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("expected integer, got '{}'", s)),
        other => Err(format!("expected integer, got {}", other.type_name())),
    }
}

pub fn float(value: &ConfigValue) -> Result<f64, String> {
    match value {
        ConfigValue::Int(i) => Ok(*i as f64),
        ConfigValue::Float(f) => Ok(*f),
        ConfigValue::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("expected number, got '{}'", s)),
        other => Err(format!("expected number, got {}", other.type_name())),
    }
}

pub fn text(value: &ConfigValue) -> Result<String, String> {
    match value {
        ConfigValue::Str(s) => Ok(s.clone()),
        ConfigValue::Bool(b) => Ok(b.to_string()),
        ConfigValue::Int(i) => Ok(i.to_string()),
        ConfigValue::Float(f) => Ok(f.to_string()),
        other => Err(format!("expected string, got {}", other.type_name())),
    }
}

/// Icon hints are either empty or `prefix:name`
pub fn icon(value: &ConfigValue) -> Result<String, String> {
    let s = text(value)?;
    if s.is_empty() {
        return Ok(s);
    }
    match s.split_once(':') {
        Some((prefix, name)) if !prefix.is_empty() && !name.is_empty() => Ok(s),
        _ => Err(format!(
            "icons must be in the form 'prefix:name', e.g. 'mdi:thermometer' (got '{}')",
            s
        )),
    }
}

/// Durations are unit-suffixed strings ("100ms", "1s", "2min", "0.5h") or a
/// mapping of components ({minutes: 1, seconds: 30}). Bare numbers are
/// rejected so a forgotten unit never silently changes scale.
pub fn duration(value: &ConfigValue) -> Result<Duration, String> {
    match value {
        ConfigValue::Duration(d) => Ok(*d),
        ConfigValue::Str(s) => duration_from_str(s.trim())
            .ok_or_else(|| format!("invalid duration '{}' (expected e.g. '100ms' or '1s')", s)),
        ConfigValue::Int(_) | ConfigValue::Float(_) => Err(
            "bare numbers are not valid durations; add a unit like '100ms' or '1s'".to_string(),
        ),
        ConfigValue::Map(map) => {
            let mut nanos = 0.0_f64;
            for (key, item) in map {
                let scale = match key.as_str() {
                    "days" => 86_400e9,
                    "hours" => 3_600e9,
                    "minutes" => 60e9,
                    "seconds" => 1e9,
                    "milliseconds" => 1e6,
                    "microseconds" => 1e3,
                    other => return Err(format!("unknown duration component '{}'", other)),
                };
                let amount = item
                    .as_float()
                    .ok_or_else(|| format!("duration component '{}' must be a number", key))?;
                if amount < 0.0 {
                    return Err(format!("duration component '{}' cannot be negative", key));
                }
                nanos += amount * scale;
            }
            Ok(Duration::from_nanos(nanos.round() as u64))
        }
        other => Err(format!("expected duration, got {}", other.type_name())),
    }
}

fn duration_from_str(s: &str) -> Option<Duration> {
    let captures = duration_re().captures(s)?;
    let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
    let scale = match captures.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "us" => 1e3,
        "ms" => 1e6,
        "s" | "sec" => 1e9,
        "min" => 60e9,
        "h" => 3_600e9,
        "d" => 86_400e9,
        _ => return None,
    };
    Some(Duration::from_nanos((amount * scale).round() as u64))
}

/// Temperatures are numbers (degrees Celsius) or strings with an optional
/// °C/°F suffix; Fahrenheit converts to Celsius.
pub fn temperature(value: &ConfigValue) -> Result<f64, String> {
    match value {
        ConfigValue::Int(i) => Ok(*i as f64),
        ConfigValue::Float(f) => Ok(*f),
        ConfigValue::Str(s) => {
            let captures = temperature_re()
                .captures(s.trim())
                .ok_or_else(|| format!("invalid temperature '{}'", s))?;
            let amount: f64 = captures
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| format!("invalid temperature '{}'", s))?;
            match captures.get(2).map(|m| m.as_str()) {
                Some(suffix) if suffix.to_ascii_lowercase().ends_with('f') => {
                    Ok((amount - 32.0) * 5.0 / 9.0)
                }
                _ => Ok(amount),
            }
        }
        other => Err(format!("expected temperature, got {}", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(boolean(&ConfigValue::Bool(true)), Ok(true));
        assert_eq!(boolean(&"ON".into()), Ok(true));
        assert_eq!(boolean(&"Disable".into()), Ok(false));
        assert!(boolean(&"definitely".into()).is_err());
        assert!(boolean(&ConfigValue::Int(1)).is_err());
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        assert_eq!(integer(&ConfigValue::Int(3)), Ok(3));
        assert_eq!(integer(&ConfigValue::Float(3.0)), Ok(3));
        assert!(integer(&ConfigValue::Float(3.5)).is_err());
        assert_eq!(integer(&"42".into()), Ok(42));
    }

    #[test]
    fn test_float_widens() {
        assert_eq!(float(&ConfigValue::Int(3)), Ok(3.0));
        assert_eq!(float(&"0.5".into()), Ok(0.5));
        assert!(float(&ConfigValue::Null).is_err());
    }

    #[test]
    fn test_text_stringifies_scalars() {
        assert_eq!(text(&"name".into()), Ok("name".to_string()));
        assert_eq!(text(&ConfigValue::Int(7)), Ok("7".to_string()));
        assert!(text(&ConfigValue::List(vec![])).is_err());
    }

    #[test]
    fn test_icon_shape() {
        assert_eq!(icon(&"mdi:power".into()), Ok("mdi:power".to_string()));
        assert_eq!(icon(&"".into()), Ok(String::new()));
        assert!(icon(&"power".into()).is_err());
        assert!(icon(&"mdi:".into()).is_err());
    }

    #[test]
    fn test_duration_suffixes() {
        assert_eq!(duration(&"100ms".into()), Ok(Duration::from_millis(100)));
        assert_eq!(duration(&"1s".into()), Ok(Duration::from_secs(1)));
        assert_eq!(duration(&"2min".into()), Ok(Duration::from_secs(120)));
        assert_eq!(duration(&"0.5h".into()), Ok(Duration::from_secs(1800)));
        assert_eq!(duration(&"3d".into()), Ok(Duration::from_secs(259_200)));
        assert_eq!(duration(&"250US".into()), Ok(Duration::from_micros(250)));
    }

    #[test]
    fn test_duration_rejects_bare_numbers() {
        assert!(duration(&ConfigValue::Int(100)).is_err());
        assert!(duration(&ConfigValue::Float(1.5)).is_err());
    }

    #[test]
    fn test_duration_rejects_garbage() {
        assert!(duration(&"fast".into()).is_err());
        assert!(duration(&"10 parsecs".into()).is_err());
    }

    #[test]
    fn test_duration_components() {
        let mut map = indexmap::IndexMap::new();
        map.insert("minutes".to_string(), ConfigValue::Int(1));
        map.insert("seconds".to_string(), ConfigValue::Int(30));
        assert_eq!(
            duration(&ConfigValue::Map(map)),
            Ok(Duration::from_secs(90))
        );

        let mut bad = indexmap::IndexMap::new();
        bad.insert("fortnights".to_string(), ConfigValue::Int(1));
        assert!(duration(&ConfigValue::Map(bad)).is_err());
    }

    #[test]
    fn test_duration_passthrough() {
        let normalized = ConfigValue::Duration(Duration::from_millis(100));
        assert_eq!(duration(&normalized), Ok(Duration::from_millis(100)));
    }

    #[test]
    fn test_temperature_celsius() {
        assert_eq!(temperature(&ConfigValue::Float(24.5)), Ok(24.5));
        assert_eq!(temperature(&ConfigValue::Int(17)), Ok(17.0));
        assert_eq!(temperature(&"30".into()), Ok(30.0));
        assert_eq!(temperature(&"21.5°C".into()), Ok(21.5));
        assert_eq!(temperature(&"-5C".into()), Ok(-5.0));
    }

    #[test]
    fn test_temperature_fahrenheit_converts() {
        assert_eq!(temperature(&"212°F".into()), Ok(100.0));
        assert_eq!(temperature(&"32F".into()), Ok(0.0));
    }

    #[test]
    fn test_temperature_rejects_garbage() {
        assert!(temperature(&"warm".into()).is_err());
        assert!(temperature(&ConfigValue::Bool(true)).is_err());
    }
}
