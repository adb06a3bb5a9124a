//! Catalog-level guarantees: deterministic generation, total decoders, and
//! round-trips over every command and event the schema document declares.

use serde_json::{json, Map, Value};

use chromate_schema::descriptor::{FieldSpec, TypeTable};
use chromate_schema::{Catalog, Protocol, Reply, ReplyShape, SchemaError, Type};
use chromate_types::CallId;

const FIXTURE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/protocol.json"));

fn catalog() -> Catalog {
    let proto = Protocol::parse(FIXTURE).unwrap();
    Catalog::build(&proto).unwrap()
}

/// A representative value for a schema type, deep enough to satisfy the
/// shallow structural checks the decoders run.
fn synthesize(ty: &Type, types: &TypeTable) -> Value {
    match ty {
        Type::Integer => json!(7),
        Type::Number => json!(0.25),
        Type::Boolean => json!(true),
        Type::String => json!("s"),
        Type::Binary => json!("aGVsbG8="),
        Type::Enum(variants) => json!(variants[0]),
        Type::Object => json!({}),
        Type::Any => json!({"anything": [1, "two"]}),
        Type::ArrayOf(items) => json!([synthesize(items, types)]),
        Type::Ref(name) => match types.get(name) {
            Some(Type::Ref(_)) | None => json!({}),
            Some(resolved) => synthesize(resolved, types),
        },
    }
}

fn object_for(fields: &[FieldSpec], types: &TypeTable, include_optional: bool) -> Value {
    let mut map = Map::new();
    for field in fields {
        if field.optional && !include_optional {
            continue;
        }
        map.insert(field.name.clone(), synthesize(&field.ty, types));
    }
    Value::Object(map)
}

#[test]
fn generation_is_deterministic() {
    let a = catalog().fingerprint();
    let b = catalog().fingerprint();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn catalogs_keep_document_order() {
    let catalog = catalog();
    let names: Vec<_> = catalog.domains().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        ["Target", "Page", "Browser", "Network", "Storage", "Fetch", "Runtime"]
    );
    // commands stay in document order within their domain
    let target = &catalog.domains()[0];
    assert_eq!(target.commands[0].method(), "Target.activateTarget");
    assert_eq!(target.commands[3].method(), "Target.createTarget");
}

#[test]
fn every_command_round_trips_its_encoding() {
    let catalog = catalog();
    let types = catalog.type_table().clone();
    let mut checked = 0;
    for cmd in catalog.commands() {
        for include_optional in [false, true] {
            let params = object_for(cmd.params(), &types, include_optional);
            let call = cmd
                .request(CallId::new(checked), Some("SESSION"), params.clone())
                .unwrap_or_else(|e| panic!("{}: {e}", cmd.method()));

            // the wire frame carries exactly what went in
            let wire: Value = serde_json::from_str(&serde_json::to_string(&call).unwrap()).unwrap();
            assert_eq!(wire["method"], cmd.method());
            assert_eq!(wire["id"], json!(checked));
            assert_eq!(wire["sessionId"], "SESSION");
            assert_eq!(wire["params"], params);

            // a schema-shaped reply decodes into the documented shape
            let reply_payload = object_for(cmd.returns(), &types, include_optional);
            let reply = cmd
                .decode_reply(reply_payload)
                .unwrap_or_else(|e| panic!("{}: {e}", cmd.method()));
            match (cmd.reply_shape(), reply) {
                (ReplyShape::Unit, Reply::Unit) => {}
                (ReplyShape::Single(name), Reply::Single(_)) => {
                    assert_eq!(name, &cmd.returns()[0].name);
                }
                (ReplyShape::Named(names), Reply::Named(values)) => {
                    assert!(values.len() <= names.len());
                    for (name, _) in &values {
                        assert!(names.contains(name));
                    }
                }
                (shape, reply) => panic!("{}: shape {shape:?} decoded {reply:?}", cmd.method()),
            }
            checked += 1;
        }
    }
    assert_eq!(checked, 60, "every command, with and without optionals");
}

#[test]
fn reply_shapes_are_discriminated() {
    let catalog = catalog();
    assert_eq!(
        catalog.command("Target.setDiscoverTargets").unwrap().reply_shape(),
        &ReplyShape::Unit
    );
    assert_eq!(
        catalog.command("Target.createTarget").unwrap().reply_shape(),
        &ReplyShape::Single("targetId".to_string())
    );
    assert_eq!(
        catalog.command("Page.navigate").unwrap().reply_shape(),
        &ReplyShape::Named(vec![
            "frameId".to_string(),
            "loaderId".to_string(),
            "errorText".to_string()
        ])
    );
    assert_eq!(
        catalog.command("Browser.getVersion").unwrap().reply_shape(),
        &ReplyShape::Named(vec![
            "protocolVersion".to_string(),
            "product".to_string(),
            "revision".to_string(),
            "userAgent".to_string(),
            "jsVersion".to_string()
        ])
    );
}

#[test]
fn event_decoders_are_total_over_the_fixture() {
    let catalog = catalog();
    let types = catalog.type_table().clone();
    let mut events = 0;
    for ev in catalog.events() {
        let params = object_for(ev.params(), &types, true);
        let decoded = ev.decode(params.clone()).unwrap_or_else(|e| panic!("{}: {e}", ev.method()));
        assert_eq!(decoded, params);

        // dropping the first required param must be rejected
        if let Some(required) = ev.params().iter().find(|p| !p.optional) {
            let mut broken = params.as_object().unwrap().clone();
            broken.remove(&required.name);
            assert!(
                matches!(ev.decode(Value::Object(broken)), Err(SchemaError::Event { .. })),
                "{} accepted a frame missing `{}`",
                ev.method(),
                required.name
            );
        }
        events += 1;
    }
    assert_eq!(events, 10);
}

#[test]
fn event_registry_routes_by_name_without_traversal() {
    let catalog = catalog();
    let registry = catalog.event_registry();
    assert_eq!(registry.len(), 10);
    let paused = registry.get("Fetch.requestPaused").unwrap();
    assert_eq!(paused.method(), "Fetch.requestPaused");
    assert!(registry.get("Fetch.requestpaused").is_none(), "method names are case-sensitive");
    assert!(registry.get("Nope.missing").is_none());
}

#[test]
fn enum_members_keep_wire_strings() {
    let catalog = catalog();
    let screenshot = catalog.command("Page.captureScreenshot").unwrap();
    let ok = screenshot.request(CallId::new(1), None, json!({"format": "webp"}));
    assert!(ok.is_ok());
    // member strings are case-sensitive wire values, not local idents
    let bad = screenshot.request(CallId::new(2), None, json!({"format": "Webp"}));
    assert!(matches!(bad, Err(SchemaError::Params { .. })));

    let grant = catalog.command("Browser.grantPermissions").unwrap();
    let ok = grant.request(
        CallId::new(3),
        None,
        json!({"permissions": ["capturedSurfaceControl", "midiSysex"]}),
    );
    assert!(ok.is_ok());
    let bad = grant.request(
        CallId::new(4),
        None,
        json!({"permissions": ["captured_surface_control"]}),
    );
    assert!(matches!(bad, Err(SchemaError::Params { .. })));
}
