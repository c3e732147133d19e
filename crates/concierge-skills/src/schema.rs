//! Argument schemas.
//!
//! Every skill declares its arguments as an ordered list of
//! `name -> { type, optional, enum?, description }`.  The orchestrator uses
//! the schema to check caller arguments before invoking the handler; the
//! schema also renders to a JSON Schema object for LLM tool declarations.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value, json};

/// The JSON type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ArgType {
    /// Returns the JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether `value` has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// Declaration of a single argument.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ArgSpec {
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    pub description: String,
}

impl ArgSpec {
    pub fn new(arg_type: ArgType, description: impl Into<String>) -> Self {
        Self {
            arg_type,
            optional: false,
            allowed: None,
            description: description.into(),
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(ArgType::String, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(ArgType::Integer, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(ArgType::Boolean, description)
    }

    /// Mark the argument as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Restrict a string argument to a fixed set of values.
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| (*v).to_owned()).collect());
        self
    }
}

/// Ordered argument schema of one skill.  May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSchema {
    args: Vec<(String, ArgSpec)>,
}

impl ArgSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument declaration.
    pub fn arg(mut self, name: impl Into<String>, spec: ArgSpec) -> Self {
        self.args.push((name.into(), spec));
        self
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgSpec)> {
        self.args.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Names of the required arguments, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, s)| !s.optional)
            .map(|(n, _)| n)
            .collect()
    }

    /// Check that the schema itself is well-formed.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for (name, spec) in self.iter() {
            if name.trim().is_empty() {
                return Err("argument with an empty name".into());
            }
            if !seen.insert(name) {
                return Err(format!("argument `{name}` declared twice"));
            }
            if spec.description.trim().is_empty() {
                return Err(format!("argument `{name}` has no description"));
            }
            if let Some(allowed) = &spec.allowed {
                if spec.arg_type != ArgType::String {
                    return Err(format!("argument `{name}` has an enum but is not a string"));
                }
                if allowed.is_empty() {
                    return Err(format!("argument `{name}` has an empty enum"));
                }
            }
        }
        Ok(())
    }

    /// Check caller arguments against this schema.
    ///
    /// `None` and `null` count as "no arguments".  Unknown arguments are
    /// ignored; required ones must be present and non-null, and every
    /// present argument must match its declared type and enum.
    pub fn check_args(&self, args: Option<&Value>) -> Result<(), String> {
        let empty = Map::new();
        let map = match args {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => return Err("arguments must be a JSON object".into()),
        };

        for (name, spec) in self.iter() {
            let value = map.get(name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if spec.optional {
                    continue;
                }
                return Err(format!("missing required argument `{name}`"));
            };
            if !spec.arg_type.matches(value) {
                return Err(format!(
                    "argument `{name}` must be of type {}",
                    spec.arg_type.as_str()
                ));
            }
            if let (Some(allowed), Some(s)) = (&spec.allowed, value.as_str())
                && !allowed.iter().any(|a| a == s)
            {
                return Err(format!(
                    "argument `{name}` must be one of: {}",
                    allowed.join(", ")
                ));
            }
        }
        Ok(())
    }

    /// Render as a JSON Schema `object` declaration.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, spec) in self.iter() {
            let mut prop = json!({
                "type": spec.arg_type.as_str(),
                "description": spec.description,
            });
            if let Some(allowed) = &spec.allowed {
                prop["enum"] = json!(allowed);
            }
            properties.insert(name.to_owned(), prop);
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }
}

impl Serialize for ArgSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.args.len()))?;
        for (name, spec) in &self.args {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}
