/*!
`args.rs`

Tokenizer for everything after the global options: a single left-to-right
scan that splits tokens into positionals and `--flag [value]` pairs, plus the
coercion helpers used to turn flag values into typed parameters.

Rules:
  - `--name` followed by nothing or by another `--` token is a switch (`true`)
  - `--name value` consumes `value` verbatim
  - anything else (including `-v`, `-5`) is positional
  - last occurrence of a flag wins
*/

use std::collections::HashMap;

use serde::Serialize;

/// Value of a flag: a bare switch or the token that followed it.
///
/// Serializes untagged, so a bare `--year` reaches the server as JSON `true`
/// and `--year 2024` as `"2024"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Switch(bool),
    Text(String),
}

impl FlagValue {
    pub fn text(s: impl Into<String>) -> Self {
        FlagValue::Text(s.into())
    }

    /// Set = present and not the empty string.
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Switch(b) => *b,
            FlagValue::Text(s) => !s.is_empty(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    pub flags: HashMap<String, FlagValue>,
}

impl ParsedArgs {
    pub fn parse<S: AsRef<str>>(argv: &[S]) -> Self {
        let mut parsed = ParsedArgs::default();
        let mut i = 0;
        while i < argv.len() {
            let arg = argv[i].as_ref();
            if let Some(key) = arg.strip_prefix("--") {
                match argv.get(i + 1).map(AsRef::as_ref) {
                    Some(next) if !next.starts_with("--") => {
                        parsed
                            .flags
                            .insert(key.to_string(), FlagValue::text(next));
                        i += 2;
                    }
                    _ => {
                        parsed.flags.insert(key.to_string(), FlagValue::Switch(true));
                        i += 1;
                    }
                }
            } else {
                parsed.positional.push(arg.to_string());
                i += 1;
            }
        }
        parsed
    }

    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Owned copy of a flag for optional parameters (absent stays absent).
    pub fn raw(&self, name: &str) -> Option<FlagValue> {
        self.flags.get(name).cloned()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flag(name).is_some_and(FlagValue::is_set)
    }

    /// Flag value when set, otherwise the literal default.
    pub fn or_default(&self, name: &str, default: &str) -> FlagValue {
        match self.flag(name) {
            Some(v) if v.is_set() => v.clone(),
            _ => FlagValue::text(default),
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        to_bool(self.flag(name), default)
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        to_int(self.flag(name), default)
    }
}

/// `true` and `"true"` -> true, `"false"` -> false, anything else -> `default`.
pub fn to_bool(value: Option<&FlagValue>, default: bool) -> bool {
    match value {
        Some(FlagValue::Switch(b)) => *b,
        Some(FlagValue::Text(s)) if s == "true" => true,
        Some(FlagValue::Text(s)) if s == "false" => false,
        _ => default,
    }
}

/// Base-10 integer from the leading digits of a text value; `default` when
/// absent, a switch, or no digits lead.
pub fn to_int(value: Option<&FlagValue>, default: i64) -> i64 {
    match value {
        Some(FlagValue::Text(s)) => leading_int(s).unwrap_or(default),
        _ => default,
    }
}

fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    if digits_end == 0 {
        return None;
    }
    // Only overflow can fail here; clamp instead of dropping to the default.
    Some(match body[..digits_end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    })
}
