use crate::error::UnsupportedLiteralError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use typegraph_schema::ValueType;

///
/// Literal
///
/// A typed constant embedded in a predicate. The payload is a JSON value;
/// `value_type` carries the semantic classification used for dialect casts
/// and bind typing. Literals always bind as parameters; they are never
/// spliced into SQL text.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Literal {
    pub value: Json,
    pub value_type: ValueType,
}

impl Literal {
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: Json::String(value.into()),
            value_type: ValueType::String,
        }
    }

    pub fn number(value: f64) -> Result<Self, UnsupportedLiteralError> {
        if !value.is_finite() {
            return Err(UnsupportedLiteralError::NonFiniteNumber);
        }

        Ok(Self {
            value: serde_json::json!(value),
            value_type: ValueType::Number,
        })
    }

    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self {
            value: Json::Bool(value),
            value_type: ValueType::Boolean,
        }
    }

    /// An ISO-8601 timestamp literal.
    #[must_use]
    pub fn date_iso(value: impl Into<String>) -> Self {
        Self {
            value: Json::String(value.into()),
            value_type: ValueType::Date,
        }
    }

    /// A structural JSON literal, classified by its JSON shape. Used for
    /// array/object predicate payloads, never for scalar comparisons.
    #[must_use]
    pub fn json(value: Json) -> Self {
        let value_type = match &value {
            Json::Array(_) => ValueType::Array,
            Json::Object(_) => ValueType::Object,
            Json::Bool(_) => ValueType::Boolean,
            Json::Number(_) => ValueType::Number,
            Json::String(_) => ValueType::String,
            Json::Null => ValueType::Unknown,
        };
        Self { value, value_type }
    }

    /// Render the payload as bare text (unquoted for strings).
    #[must_use]
    pub fn as_text(&self) -> String {
        match &self.value {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

///
/// Parameter
///
/// A named, deferred bind value of a declared type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value_type: ValueType,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

///
/// LiteralInput
///
/// Accepted user inputs for literal coercion. Anything else (objects,
/// nulls outside is-null predicates) is rejected at construction.
///

#[derive(Clone, Debug)]
pub enum LiteralInput {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// An untyped JSON value; scalars coerce, structures and nulls are
    /// rejected.
    Json(Json),
}

impl From<&str> for LiteralInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LiteralInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for LiteralInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for LiteralInput {
    fn from(value: i64) -> Self {
        #[expect(clippy::cast_precision_loss)]
        let widened = value as f64;
        Self::Number(widened)
    }
}

impl From<i32> for LiteralInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for LiteralInput {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for LiteralInput {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for LiteralInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Json> for LiteralInput {
    fn from(value: Json) -> Self {
        Self::Json(value)
    }
}

/// Coerce a user value into a literal, optionally steered by the target
/// field's declared type.
///
/// Dates become ISO-8601 string literals tagged `date`. Native
/// string/number/boolean inputs keep their type, except that a string
/// input retags to `date` as-is, or parses to `number`/`boolean` when the
/// target field declares one of those.
pub fn coerce(
    input: impl Into<LiteralInput>,
    preferred: Option<ValueType>,
) -> Result<Literal, UnsupportedLiteralError> {
    match input.into() {
        LiteralInput::Date(value) => Ok(Literal::date_iso(
            value.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        LiteralInput::Number(value) => Literal::number(value),
        LiteralInput::Boolean(value) => Ok(Literal::boolean(value)),
        LiteralInput::Json(value) => coerce_json(value, preferred),
        LiteralInput::Text(text) => match preferred {
            Some(ValueType::Date) => Ok(Literal::date_iso(text)),
            Some(ValueType::Number) => {
                let parsed: f64 = text
                    .parse()
                    .map_err(|_| UnsupportedLiteralError::NotANumber { text: text.clone() })?;
                Literal::number(parsed)
            }
            Some(ValueType::Boolean) => match text.as_str() {
                "true" => Ok(Literal::boolean(true)),
                "false" => Ok(Literal::boolean(false)),
                _ => Err(UnsupportedLiteralError::NotABoolean { text }),
            },
            _ => Ok(Literal::string(text)),
        },
    }
}

fn coerce_json(
    value: Json,
    preferred: Option<ValueType>,
) -> Result<Literal, UnsupportedLiteralError> {
    match value {
        Json::Null => Err(UnsupportedLiteralError::NullLiteral),
        Json::Bool(b) => Ok(Literal::boolean(b)),
        Json::Number(n) => {
            let value = n
                .as_f64()
                .ok_or(UnsupportedLiteralError::NonFiniteNumber)?;
            Literal::number(value)
        }
        Json::String(text) => coerce(text, preferred),
        Json::Array(_) => Err(UnsupportedLiteralError::UnsupportedInput {
            found: "array".to_string(),
            expected: preferred.unwrap_or(ValueType::Unknown),
        }),
        Json::Object(_) => Err(UnsupportedLiteralError::UnsupportedInput {
            found: "object".to_string(),
            expected: preferred.unwrap_or(ValueType::Unknown),
        }),
    }
}
