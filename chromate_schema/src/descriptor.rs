//! Descriptor values rendered from a schema document.
//!
//! A [`CommandDescriptor`] turns parameter values into a JSON-RPC request
//! frame for a caller supplied id and decodes the matching reply. An
//! [`EventDescriptor`] decodes the `params` subtree of a notification.
//! Decoders are total over the documented schema and reject mismatched
//! shapes with a structured error.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use chromate_types::{CallId, MethodCall};

use crate::schema::Type;
use crate::{Result, SchemaError};

/// Resolved shapes of every named type in a schema document, keyed by the
/// qualified `Domain.Name`.
pub type TypeTable = HashMap<String, Type>;

/// One parameter, property or return value of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name, `lowerCamelCase`.
    pub name: String,
    /// Escaped local identifier, `snake_case`.
    pub local_name: String,
    pub ty: Type,
    pub optional: bool,
}

/// How a command's JSON reply maps onto a return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyShape {
    /// The command returns nothing.
    Unit,
    /// The reply carries exactly one named value.
    Single(String),
    /// The reply carries a tuple of named values, in schema order.
    Named(Vec<String>),
}

/// A decoded command reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Unit,
    Single(Value),
    Named(Vec<(String, Value)>),
}

#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    method: String,
    params: Vec<FieldSpec>,
    returns: Vec<FieldSpec>,
    reply: ReplyShape,
    types: Arc<TypeTable>,
}

impl CommandDescriptor {
    pub(crate) fn new(
        method: String,
        params: Vec<FieldSpec>,
        returns: Vec<FieldSpec>,
        types: Arc<TypeTable>,
    ) -> Self {
        let reply = match returns.len() {
            0 => ReplyShape::Unit,
            1 => ReplyShape::Single(returns[0].name.clone()),
            _ => ReplyShape::Named(returns.iter().map(|r| r.name.clone()).collect()),
        };
        Self {
            method,
            params,
            returns,
            reply,
            types,
        }
    }

    /// Qualified method name, `Domain.command`.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[FieldSpec] {
        &self.params
    }

    pub fn returns(&self) -> &[FieldSpec] {
        &self.returns
    }

    pub fn reply_shape(&self) -> &ReplyShape {
        &self.reply
    }

    /// Produces the request frame for this command with the given id.
    ///
    /// `params` must satisfy the parameter schema: required fields present,
    /// no undocumented fields, shallow types in agreement.
    pub fn request(
        &self,
        id: CallId,
        session_id: Option<&str>,
        params: Value,
    ) -> Result<MethodCall> {
        let params = match params {
            Value::Null => Value::Object(Default::default()),
            value => value,
        };
        let object = params.as_object().ok_or_else(|| SchemaError::Params {
            method: self.method.clone(),
            reason: "params must be a json object".to_string(),
        })?;

        for field in &self.params {
            match object.get(&field.name) {
                Some(value) => {
                    if !value_matches(&field.ty, value, &self.types) {
                        return Err(SchemaError::Params {
                            method: self.method.clone(),
                            reason: format!("field `{}` has a mismatched type", field.name),
                        });
                    }
                }
                None if field.optional => {}
                None => {
                    return Err(SchemaError::Params {
                        method: self.method.clone(),
                        reason: format!("missing required field `{}`", field.name),
                    })
                }
            }
        }
        if let Some(unknown) = object.keys().find(|k| !self.params.iter().any(|p| &p.name == *k)) {
            return Err(SchemaError::Params {
                method: self.method.clone(),
                reason: format!("undocumented field `{unknown}`"),
            });
        }

        Ok(MethodCall {
            id,
            session_id: session_id.map(str::to_string),
            method: self.method.clone().into(),
            params,
        })
    }

    /// Decodes a response's `result` payload into this command's reply value.
    pub fn decode_reply(&self, result: Value) -> Result<Reply> {
        let result = match result {
            Value::Null => Value::Object(Default::default()),
            value => value,
        };
        let object = result.as_object().ok_or_else(|| SchemaError::Reply {
            method: self.method.clone(),
            reason: "result must be a json object".to_string(),
        })?;

        let mut decoded = Vec::with_capacity(self.returns.len());
        for field in &self.returns {
            match object.get(&field.name) {
                Some(value) => {
                    if !value_matches(&field.ty, value, &self.types) {
                        return Err(SchemaError::Reply {
                            method: self.method.clone(),
                            reason: format!("return `{}` has a mismatched type", field.name),
                        });
                    }
                    decoded.push((field.name.clone(), value.clone()));
                }
                None if field.optional => {}
                None => {
                    return Err(SchemaError::Reply {
                        method: self.method.clone(),
                        reason: format!("missing return value `{}`", field.name),
                    })
                }
            }
        }

        // undocumented extras on inbound frames are ignored
        Ok(match &self.reply {
            ReplyShape::Unit => Reply::Unit,
            ReplyShape::Single(_) => match decoded.into_iter().next() {
                Some((_, value)) => Reply::Single(value),
                // a missing required value already errored, so this is an
                // omitted optional return
                None => Reply::Single(Value::Null),
            },
            ReplyShape::Named(_) => Reply::Named(decoded),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EventDescriptor {
    method: String,
    params: Vec<FieldSpec>,
    types: Arc<TypeTable>,
}

impl EventDescriptor {
    pub(crate) fn new(method: String, params: Vec<FieldSpec>, types: Arc<TypeTable>) -> Self {
        Self {
            method,
            params,
            types,
        }
    }

    /// Qualified method name, `Domain.event`.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[FieldSpec] {
        &self.params
    }

    /// Decodes the `params` subtree of a notification into the event value.
    pub fn decode(&self, params: Value) -> Result<Value> {
        let params = match params {
            Value::Null => Value::Object(Default::default()),
            value => value,
        };
        let object = params.as_object().ok_or_else(|| SchemaError::Event {
            method: self.method.clone(),
            reason: "params must be a json object".to_string(),
        })?;
        for field in &self.params {
            match object.get(&field.name) {
                Some(value) => {
                    if !value_matches(&field.ty, value, &self.types) {
                        return Err(SchemaError::Event {
                            method: self.method.clone(),
                            reason: format!("param `{}` has a mismatched type", field.name),
                        });
                    }
                }
                None if field.optional => {}
                None => {
                    return Err(SchemaError::Event {
                        method: self.method.clone(),
                        reason: format!("missing param `{}`", field.name),
                    })
                }
            }
        }
        Ok(params)
    }
}

/// Shallow structural agreement between a schema type and a json value.
///
/// References resolve through the type table one level deep; object
/// properties are not traversed, which keeps recursive type definitions
/// finite.
fn value_matches(ty: &Type, value: &Value, types: &TypeTable) -> bool {
    match ty {
        Type::Integer => value.is_i64() || value.is_u64(),
        Type::Number => value.is_number(),
        Type::Boolean => value.is_boolean(),
        Type::String | Type::Binary => value.is_string(),
        Type::Enum(variants) => value
            .as_str()
            .map(|s| variants.iter().any(|v| v == s))
            .unwrap_or(false),
        Type::Object | Type::Any => ty == &Type::Any || value.is_object(),
        Type::ArrayOf(items) => value
            .as_array()
            .map(|vs| vs.iter().all(|v| value_matches(items, v, types)))
            .unwrap_or(false),
        Type::Ref(name) => match types.get(name) {
            Some(Type::Ref(_)) => true,
            Some(resolved) => value_matches(resolved, value, types),
            // unknown references are tolerated, the browser may be newer
            None => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> Arc<TypeTable> {
        let mut t = TypeTable::new();
        t.insert("Target.TargetID".to_string(), Type::String);
        t.insert("Target.TargetInfo".to_string(), Type::Object);
        Arc::new(t)
    }

    fn create_target() -> CommandDescriptor {
        CommandDescriptor::new(
            "Target.createTarget".to_string(),
            vec![
                FieldSpec {
                    name: "url".into(),
                    local_name: "url".into(),
                    ty: Type::String,
                    optional: false,
                },
                FieldSpec {
                    name: "newWindow".into(),
                    local_name: "new_window".into(),
                    ty: Type::Boolean,
                    optional: true,
                },
            ],
            vec![FieldSpec {
                name: "targetId".into(),
                local_name: "target_id".into(),
                ty: Type::Ref("Target.TargetID".into()),
                optional: false,
            }],
            table(),
        )
    }

    #[test]
    fn request_carries_method_id_and_params() {
        let cmd = create_target();
        let call = cmd
            .request(
                CallId::new(9),
                Some("SID"),
                json!({"url": "about:blank", "newWindow": true}),
            )
            .unwrap();
        assert_eq!(call.method, "Target.createTarget");
        assert_eq!(call.id, CallId::new(9));
        assert_eq!(call.session_id.as_deref(), Some("SID"));
        assert_eq!(call.params["newWindow"], true);
    }

    #[test]
    fn request_rejects_missing_required_and_unknown_fields() {
        let cmd = create_target();
        assert!(matches!(
            cmd.request(CallId::new(0), None, json!({})),
            Err(SchemaError::Params { .. })
        ));
        assert!(matches!(
            cmd.request(CallId::new(0), None, json!({"url": "x", "bogus": 1})),
            Err(SchemaError::Params { .. })
        ));
        assert!(matches!(
            cmd.request(CallId::new(0), None, json!({"url": 42})),
            Err(SchemaError::Params { .. })
        ));
    }

    #[test]
    fn single_valued_reply_decodes_through_the_ref() {
        let cmd = create_target();
        assert_eq!(
            cmd.decode_reply(json!({"targetId": "T-1"})).unwrap(),
            Reply::Single(json!("T-1"))
        );
        // ref resolves to string, so a number is a mismatch
        assert!(matches!(
            cmd.decode_reply(json!({"targetId": 5})),
            Err(SchemaError::Reply { .. })
        ));
        assert!(matches!(
            cmd.decode_reply(json!({})),
            Err(SchemaError::Reply { .. })
        ));
    }

    #[test]
    fn unit_reply_tolerates_empty_and_extra() {
        let cmd = CommandDescriptor::new(
            "Page.enable".to_string(),
            vec![],
            vec![],
            table(),
        );
        assert_eq!(cmd.decode_reply(json!({})).unwrap(), Reply::Unit);
        assert_eq!(cmd.decode_reply(Value::Null).unwrap(), Reply::Unit);
        assert_eq!(cmd.decode_reply(json!({"extra": 1})).unwrap(), Reply::Unit);
    }

    #[test]
    fn named_reply_preserves_schema_order() {
        let cmd = CommandDescriptor::new(
            "Browser.getWindowForTarget".to_string(),
            vec![],
            vec![
                FieldSpec {
                    name: "windowId".into(),
                    local_name: "window_id".into(),
                    ty: Type::Integer,
                    optional: false,
                },
                FieldSpec {
                    name: "bounds".into(),
                    local_name: "bounds".into(),
                    ty: Type::Object,
                    optional: false,
                },
            ],
            table(),
        );
        let reply = cmd
            .decode_reply(json!({"bounds": {"left": 0}, "windowId": 3}))
            .unwrap();
        assert_eq!(
            reply,
            Reply::Named(vec![
                ("windowId".to_string(), json!(3)),
                ("bounds".to_string(), json!({"left": 0})),
            ])
        );
    }

    #[test]
    fn event_decoder_is_total_and_rejecting() {
        let ev = EventDescriptor::new(
            "Target.targetCrashed".to_string(),
            vec![
                FieldSpec {
                    name: "targetId".into(),
                    local_name: "target_id".into(),
                    ty: Type::Ref("Target.TargetID".into()),
                    optional: false,
                },
                FieldSpec {
                    name: "status".into(),
                    local_name: "status".into(),
                    ty: Type::String,
                    optional: false,
                },
            ],
            table(),
        );
        let ok = ev
            .decode(json!({"targetId": "T", "status": "oom", "ignored": []}))
            .unwrap();
        assert_eq!(ok["status"], "oom");
        assert!(matches!(
            ev.decode(json!({"targetId": "T"})),
            Err(SchemaError::Event { .. })
        ));
        assert!(matches!(ev.decode(json!([])), Err(SchemaError::Event { .. })));
    }
}
