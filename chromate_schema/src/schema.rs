//! Serde model of the protocol schema document.
//!
//! The document is a JSON tree: a `version` object and a list of domains,
//! each domain holding named types, commands and events. Field order inside
//! the document is preserved everywhere; the catalog builder relies on it for
//! deterministic output.

use serde::Deserialize;

use crate::{Result, SchemaError};

/// The root of a schema document.
#[derive(Debug, Clone, Deserialize)]
pub struct Protocol {
    pub version: Version,
    pub domains: Vec<Domain>,
}

impl Protocol {
    /// Parses a schema document from its JSON text.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    pub major: String,
    pub minor: String,
}

/// A named namespace of types, commands and events.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub domain: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
}

/// A named type declared by a domain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(flatten)]
    pub ty: TypeRef,
    #[serde(default)]
    pub properties: Vec<Param>,
}

/// A parameter, property or return value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(flatten)]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<Param>,
    #[serde(default)]
    pub returns: Vec<Param>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<Param>,
}

/// The raw type fields of a schema node, before resolution.
///
/// Exactly one of `type` or `$ref` is present in a well formed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeRef {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub items: Option<Box<TypeRef>>,
    #[serde(rename = "enum", default)]
    pub variants: Option<Vec<String>>,
}

/// A resolved type shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Integer,
    Number,
    Boolean,
    String,
    Object,
    Any,
    Binary,
    /// Enum members keep their original wire strings.
    Enum(Vec<String>),
    ArrayOf(Box<Type>),
    /// Reference to a named type, possibly `Domain.Name` qualified.
    Ref(String),
}

impl TypeRef {
    /// Resolves the raw fields into a [`Type`]. `container` names the
    /// surrounding declaration for error reporting.
    pub fn resolve(&self, container: &str) -> Result<Type> {
        if let Some(reference) = &self.reference {
            return Ok(Type::Ref(reference.clone()));
        }
        let kind = self.kind.as_deref().ok_or_else(|| SchemaError::MissingType {
            container: container.to_string(),
        })?;
        let ty = match kind {
            "integer" => Type::Integer,
            "number" => Type::Number,
            "boolean" => Type::Boolean,
            "string" => {
                if let Some(variants) = &self.variants {
                    Type::Enum(variants.clone())
                } else {
                    Type::String
                }
            }
            "object" => Type::Object,
            "any" => Type::Any,
            "binary" => Type::Binary,
            "array" => {
                let items = self.items.as_deref().ok_or_else(|| SchemaError::MissingItems {
                    container: container.to_string(),
                })?;
                Type::ArrayOf(Box::new(items.resolve(container)?))
            }
            other => {
                return Err(SchemaError::UnknownTypeKind {
                    container: container.to_string(),
                    kind: other.to_string(),
                })
            }
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_scalar_kinds() {
        let raw = TypeRef {
            kind: Some("integer".into()),
            ..Default::default()
        };
        assert_eq!(raw.resolve("t").unwrap(), Type::Integer);
    }

    #[test]
    fn resolves_enum_strings() {
        let raw = TypeRef {
            kind: Some("string".into()),
            variants: Some(vec!["page".into(), "iframe".into()]),
            ..Default::default()
        };
        assert_eq!(
            raw.resolve("t").unwrap(),
            Type::Enum(vec!["page".into(), "iframe".into()])
        );
    }

    #[test]
    fn resolves_arrays_and_refs() {
        let raw = TypeRef {
            kind: Some("array".into()),
            items: Some(Box::new(TypeRef {
                reference: Some("TargetInfo".into()),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(
            raw.resolve("t").unwrap(),
            Type::ArrayOf(Box::new(Type::Ref("TargetInfo".into())))
        );
    }

    #[test]
    fn ref_wins_over_missing_kind() {
        let raw = TypeRef {
            reference: Some("Network.Cookie".into()),
            ..Default::default()
        };
        assert_eq!(raw.resolve("t").unwrap(), Type::Ref("Network.Cookie".into()));
    }

    #[test]
    fn missing_both_is_an_error() {
        let raw = TypeRef::default();
        assert!(matches!(
            raw.resolve("Target.createTarget"),
            Err(SchemaError::MissingType { .. })
        ));
    }
}
