//! Registry value kinds and value coercion.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryValueKind {
    String,
    ExpandString,
    Binary,
    DWord,
    MultiString,
    QWord,
    Unknown,
}

impl RegistryValueKind {
    /// Every kind, in the order completion offers them.
    pub const ALL: [RegistryValueKind; 7] = [
        RegistryValueKind::String,
        RegistryValueKind::ExpandString,
        RegistryValueKind::Binary,
        RegistryValueKind::DWord,
        RegistryValueKind::MultiString,
        RegistryValueKind::QWord,
        RegistryValueKind::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegistryValueKind::String => "String",
            RegistryValueKind::ExpandString => "ExpandString",
            RegistryValueKind::Binary => "Binary",
            RegistryValueKind::DWord => "DWord",
            RegistryValueKind::MultiString => "MultiString",
            RegistryValueKind::QWord => "QWord",
            RegistryValueKind::Unknown => "Unknown",
        }
    }

    /// Kind implied by an untyped value.
    pub fn infer(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Bool(_)) => {
                RegistryValueKind::String
            }
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) if v >= i64::from(i32::MIN) && v <= i64::from(u32::MAX) => {
                    RegistryValueKind::DWord
                }
                _ => RegistryValueKind::QWord,
            },
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {
                RegistryValueKind::MultiString
            }
            Some(Value::Array(_)) => RegistryValueKind::Binary,
            Some(Value::Object(_)) => RegistryValueKind::String,
        }
    }

    /// Convert `value` into the representation stored for this kind.
    pub fn coerce(self, value: Option<&Value>) -> Result<Value, String> {
        let value = match value {
            None | Some(Value::Null) => return Ok(self.empty_value()),
            Some(v) => v,
        };
        match self {
            RegistryValueKind::String | RegistryValueKind::ExpandString => match value {
                Value::String(s) => Ok(Value::String(s.clone())),
                Value::Number(_) | Value::Bool(_) => Ok(Value::String(value.to_string())),
                _ => Err("expected a string".to_string()),
            },
            RegistryValueKind::DWord => {
                let v = integer_of(value)?;
                if v >= i128::from(i32::MIN) && v < 0 {
                    // negative values keep their 32-bit pattern
                    Ok(Value::from(v as i32 as u32))
                } else if (0..=i128::from(u32::MAX)).contains(&v) {
                    Ok(Value::from(v as u32))
                } else {
                    Err(format!("{} is out of range for a 32-bit value", v))
                }
            }
            RegistryValueKind::QWord => {
                let v = integer_of(value)?;
                if v >= i128::from(i64::MIN) && v < 0 {
                    Ok(Value::from(v as i64 as u64))
                } else if (0..=i128::from(u64::MAX)).contains(&v) {
                    Ok(Value::from(v as u64))
                } else {
                    Err(format!("{} is out of range for a 64-bit value", v))
                }
            }
            RegistryValueKind::MultiString => match value {
                Value::String(s) => Ok(Value::Array(vec![Value::String(s.clone())])),
                Value::Array(items) if items.iter().all(Value::is_string) => {
                    Ok(Value::Array(items.clone()))
                }
                _ => Err("expected a string or a list of strings".to_string()),
            },
            RegistryValueKind::Binary | RegistryValueKind::Unknown => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item.as_u64() {
                        Some(b) if b <= u64::from(u8::MAX) => Ok(Value::from(b)),
                        _ => Err(format!("{} is not a byte", item)),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                Value::Number(n) => match n.as_u64() {
                    Some(b) if b <= u64::from(u8::MAX) => Ok(Value::Array(vec![Value::from(b)])),
                    _ => Err(format!("{} is not a byte", n)),
                },
                _ => Err("expected a list of bytes".to_string()),
            },
        }
    }

    fn empty_value(self) -> Value {
        match self {
            RegistryValueKind::String | RegistryValueKind::ExpandString => {
                Value::String(String::new())
            }
            RegistryValueKind::DWord | RegistryValueKind::QWord => Value::from(0u32),
            RegistryValueKind::MultiString
            | RegistryValueKind::Binary
            | RegistryValueKind::Unknown => Value::Array(Vec::new()),
        }
    }
}

fn integer_of(value: &Value) -> Result<i128, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .ok_or_else(|| format!("{} is not an integer", n)),
        Value::String(s) => {
            let trimmed = s.trim();
            let parsed = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                Some(hex) => i128::from_str_radix(hex, 16),
                None => trimmed.parse::<i128>(),
            };
            parsed.map_err(|_| format!("'{}' is not an integer", s))
        }
        _ => Err("expected an integer".to_string()),
    }
}

impl fmt::Display for RegistryValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegistryValueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown registry value kind '{}'", s))
    }
}
