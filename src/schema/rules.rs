//! Field rule descriptors and their interpreter
//!
//! A schema is plain data: an ordered list of [`Field`]s, each with a kind and
//! an ordered chain of [`Check`]s. [`Field::check`] is the single interpreter
//! for scalar fields. It stops at the first failing rule so a field never
//! reports more than one error. Collections only get their own presence and
//! minimum-size checks here; walking their elements is the validator's job.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

use crate::core::timeslots::is_time_slot;

/// ISO calendar date, `YYYY-MM-DD`
pub static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Day-first calendar date, `DD/MM/YYYY`
pub static DAY_FIRST_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").unwrap());

/// Time of day with literal zero seconds, `HH:MM:00`
pub static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:00$").unwrap());

/// Message for missing non-text values (ids, collections)
pub const REQUIRED: &str = "Required";

/// Message for values outside an enumerated set
pub const INVALID_INPUT: &str = "Invalid input";

/// Message for collection elements that are not file objects
pub const NOT_A_FILE: &str = "Input not instance of File";

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or absent value where presence is mandatory
    Required,
    /// Value present but of the wrong shape
    Format,
    /// Value longer than the field's cap
    TooLong,
    /// Collection with fewer elements than its minimum
    TooShort,
    /// Value not in its allowed set
    Enum,
    /// Value of the wrong JSON type
    Type,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Format => "format",
            ErrorKind::TooLong => "too_long",
            ErrorKind::TooShort => "too_short",
            ErrorKind::Enum => "enum",
            ErrorKind::Type => "type",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed rule, before it is attached to a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ErrorKind,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// `Expected <expected>, received <actual>`
    pub fn type_mismatch(expected: &str, actual: &Value) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("Expected {}, received {}", expected, json_type(actual)),
        )
    }
}

/// JSON type name of a value
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Presence policy of a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent or empty fails with the given message
    Required(&'static str),
    /// Absent or empty is accepted and skips the remaining checks
    Optional,
}

/// One step of a text field's rule chain
#[derive(Debug, Clone)]
pub enum Check {
    Pattern {
        regex: &'static Regex,
        message: &'static str,
    },
    TimeSlot {
        message: &'static str,
    },
    OneOf {
        allowed: &'static [&'static str],
        message: &'static str,
    },
    MaxChars {
        limit: usize,
        message: &'static str,
    },
}

impl Check {
    fn apply(&self, text: &str) -> Result<(), Violation> {
        match self {
            Check::Pattern { regex, message } => {
                if regex.is_match(text) {
                    Ok(())
                } else {
                    Err(Violation::new(ErrorKind::Format, *message))
                }
            }
            Check::TimeSlot { message } => {
                if is_time_slot(text) {
                    Ok(())
                } else {
                    Err(Violation::new(ErrorKind::Format, *message))
                }
            }
            Check::OneOf { allowed, message } => {
                if allowed.contains(&text) {
                    Ok(())
                } else {
                    Err(Violation::new(ErrorKind::Enum, *message))
                }
            }
            Check::MaxChars { limit, message } => {
                if text.chars().count() <= *limit {
                    Ok(())
                } else {
                    Err(Violation::new(ErrorKind::TooLong, *message))
                }
            }
        }
    }
}

/// Minimum element count of a collection
#[derive(Debug, Clone, Copy)]
pub struct MinItems {
    pub count: usize,
    pub message: &'static str,
}

/// What the elements of a collection must be
#[derive(Debug)]
pub enum Items {
    /// File-like attachment objects
    Files,
    /// Nested records with their own schema
    Objects(ObjectSchema),
}

/// Kind of a field and its rule chain
#[derive(Debug)]
pub enum FieldKind {
    Text {
        presence: Presence,
        checks: Vec<Check>,
    },
    Number,
    List {
        required: bool,
        min: Option<MinItems>,
        items: Items,
    },
}

/// A declared field of an object schema
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub fn required_text(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                presence: Presence::Required(message),
                checks: Vec::new(),
            },
        }
    }

    pub fn optional_text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                presence: Presence::Optional,
                checks: Vec::new(),
            },
        }
    }

    pub fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
        }
    }

    pub fn list(name: &'static str, items: Items) -> Self {
        Self {
            name,
            kind: FieldKind::List {
                required: true,
                min: None,
                items,
            },
        }
    }

    pub fn optional_list(name: &'static str, items: Items) -> Self {
        Self {
            name,
            kind: FieldKind::List {
                required: false,
                min: None,
                items,
            },
        }
    }

    pub fn pattern(self, regex: &'static Regex, message: &'static str) -> Self {
        self.push_check(Check::Pattern { regex, message })
    }

    pub fn time_slot(self, message: &'static str) -> Self {
        self.push_check(Check::TimeSlot { message })
    }

    pub fn one_of(self, allowed: &'static [&'static str], message: &'static str) -> Self {
        self.push_check(Check::OneOf { allowed, message })
    }

    pub fn max_chars(self, limit: usize, message: &'static str) -> Self {
        self.push_check(Check::MaxChars { limit, message })
    }

    pub fn min_items(mut self, count: usize, message: &'static str) -> Self {
        if let FieldKind::List { min, .. } = &mut self.kind {
            *min = Some(MinItems { count, message });
        }
        self
    }

    /// Schema of the elements, for collections of nested objects
    pub fn item_schema(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            FieldKind::List {
                items: Items::Objects(schema),
                ..
            } => Some(schema),
            _ => None,
        }
    }

    fn push_check(mut self, check: Check) -> Self {
        if let FieldKind::Text { checks, .. } = &mut self.kind {
            checks.push(check);
        }
        self
    }

    /// Run the rule chain of a scalar field against its raw value
    ///
    /// Collections only check presence and type here, see [`Field::check_list`].
    pub fn check(&self, value: Option<&Value>) -> Result<(), Violation> {
        match &self.kind {
            FieldKind::Text { presence, checks } => check_text(*presence, checks, value),
            FieldKind::Number => match value {
                None => Err(Violation::new(ErrorKind::Required, REQUIRED)),
                Some(Value::Number(_)) => Ok(()),
                Some(other) => Err(Violation::type_mismatch("number", other)),
            },
            FieldKind::List { .. } => self.check_list(value).map(|_| ()),
        }
    }

    /// Check a collection's presence, type and minimum size
    ///
    /// Returns the elements to recurse into; `None` when an optional
    /// collection is absent.
    pub fn check_list<'v>(&self, value: Option<&'v Value>) -> Result<Option<&'v [Value]>, Violation> {
        let FieldKind::List { required, min, .. } = &self.kind else {
            return Ok(None);
        };

        let items = match value {
            None if *required => return Err(Violation::new(ErrorKind::Required, REQUIRED)),
            None => return Ok(None),
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => return Err(Violation::type_mismatch("array", other)),
        };

        if let Some(min) = min {
            if items.len() < min.count {
                return Err(Violation::new(ErrorKind::TooShort, min.message));
            }
        }

        Ok(Some(items))
    }
}

fn check_text(presence: Presence, checks: &[Check], value: Option<&Value>) -> Result<(), Violation> {
    let text = match value {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(Violation::type_mismatch("string", other)),
    };

    if text.is_empty() {
        return match presence {
            Presence::Required(message) => Err(Violation::new(ErrorKind::Required, message)),
            Presence::Optional => Ok(()),
        };
    }

    checks.iter().try_for_each(|check| check.apply(text))
}

/// Whether a value has the shape of a browser `File`: name, type and size
pub fn is_file_like(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    let has_name = obj.get("name").is_some_and(Value::is_string);
    let has_type = obj.get("type").is_some_and(Value::is_string);
    let has_size = obj.get("size").is_some_and(Value::is_u64);
    let modified_ok = obj.get("lastModified").map_or(true, Value::is_i64);

    has_name && has_type && has_size && modified_ok
}

/// Ordered list of declared fields
#[derive(Debug, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
