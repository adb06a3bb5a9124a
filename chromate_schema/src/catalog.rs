//! Ordered descriptor catalogs built from a parsed schema document.
//!
//! Generation depends only on the schema: domains, types, commands and
//! events come out in document order, names are escaped with a stable
//! scheme, and two builds over the same document are byte-for-byte
//! identical (see [`Catalog::fingerprint`]).

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::descriptor::{CommandDescriptor, EventDescriptor, FieldSpec, ReplyShape, TypeTable};
use crate::schema::{Param, Protocol, Type};
use crate::Result;

/// Rust reserved words, escaped by appending an underscore.
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn escape(name: String) -> String {
    if RESERVED.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Local identifier for a protocol field or method name.
pub fn local_ident(name: &str) -> String {
    escape(name.to_snake_case())
}

/// Local identifier for a protocol type name.
pub fn type_ident(name: &str) -> String {
    escape(name.to_upper_camel_case())
}

/// A named type rendered from a domain.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    /// Declaring domain.
    pub domain: String,
    /// Wire name inside the domain.
    pub id: String,
    /// `Domain.Name` qualified wire name.
    pub qualified: String,
    /// Escaped local name.
    pub rust_name: String,
    pub ty: Type,
}

/// Ordered catalog of one domain.
#[derive(Debug, Clone)]
pub struct DomainCatalog {
    pub name: String,
    pub types: Vec<TypeSpec>,
    pub commands: Vec<CommandDescriptor>,
    pub events: Vec<EventDescriptor>,
}

/// The full rendered catalog of a schema document.
#[derive(Debug, Clone)]
pub struct Catalog {
    domains: Vec<DomainCatalog>,
    commands: HashMap<String, (usize, usize)>,
    events: HashMap<String, (usize, usize)>,
    types: Arc<TypeTable>,
}

impl Catalog {
    pub fn build(proto: &Protocol) -> Result<Self> {
        // first pass: resolve every named type so refs can be checked later
        let mut types = TypeTable::new();
        for domain in &proto.domains {
            for def in &domain.types {
                let container = format!("{}.{}", domain.domain, def.id);
                let ty = qualify(def.ty.resolve(&container)?, &domain.domain);
                types.insert(container, ty);
            }
        }
        let types = Arc::new(types);

        let mut domains = Vec::with_capacity(proto.domains.len());
        let mut commands = HashMap::new();
        let mut events = HashMap::new();

        for (di, domain) in proto.domains.iter().enumerate() {
            let mut rendered = DomainCatalog {
                name: domain.domain.clone(),
                types: Vec::with_capacity(domain.types.len()),
                commands: Vec::with_capacity(domain.commands.len()),
                events: Vec::with_capacity(domain.events.len()),
            };

            for def in &domain.types {
                let qualified = format!("{}.{}", domain.domain, def.id);
                rendered.types.push(TypeSpec {
                    domain: domain.domain.clone(),
                    id: def.id.clone(),
                    rust_name: type_ident(&def.id),
                    ty: types[&qualified].clone(),
                    qualified,
                });
            }

            for (ci, cmd) in domain.commands.iter().enumerate() {
                let method = format!("{}.{}", domain.domain, cmd.name);
                let params = fields(&cmd.parameters, &domain.domain, &method)?;
                let returns = fields(&cmd.returns, &domain.domain, &method)?;
                commands.insert(method.clone(), (di, ci));
                rendered
                    .commands
                    .push(CommandDescriptor::new(method, params, returns, types.clone()));
            }

            for (ei, ev) in domain.events.iter().enumerate() {
                let method = format!("{}.{}", domain.domain, ev.name);
                let params = fields(&ev.parameters, &domain.domain, &method)?;
                events.insert(method.clone(), (di, ei));
                rendered
                    .events
                    .push(EventDescriptor::new(method, params, types.clone()));
            }

            domains.push(rendered);
        }

        Ok(Self {
            domains,
            commands,
            events,
            types,
        })
    }

    pub fn domains(&self) -> &[DomainCatalog] {
        &self.domains
    }

    /// Looks up a command descriptor by its qualified method name.
    pub fn command(&self, method: &str) -> Option<&CommandDescriptor> {
        let (di, ci) = *self.commands.get(method)?;
        Some(&self.domains[di].commands[ci])
    }

    /// Looks up an event descriptor by its qualified method name.
    pub fn event(&self, method: &str) -> Option<&EventDescriptor> {
        let (di, ei) = *self.events.get(method)?;
        Some(&self.domains[di].events[ei])
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.domains.iter().flat_map(|d| d.commands.iter())
    }

    pub fn events(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.domains.iter().flat_map(|d| d.events.iter())
    }

    /// The method-name → event-descriptor map used for inbound routing.
    pub fn event_registry(&self) -> HashMap<&str, &EventDescriptor> {
        self.events().map(|e| (e.method(), e)).collect()
    }

    pub fn type_table(&self) -> &Arc<TypeTable> {
        &self.types
    }

    /// A stable textual rendering of the whole catalog.
    ///
    /// Two catalogs built from the same schema document render identically,
    /// byte for byte.
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        for domain in &self.domains {
            let _ = writeln!(out, "domain {}", domain.name);
            for ty in &domain.types {
                let _ = writeln!(out, "  type {} {} = {:?}", ty.qualified, ty.rust_name, ty.ty);
            }
            for cmd in &domain.commands {
                let _ = write!(out, "  command {}(", cmd.method());
                render_fields(&mut out, cmd.params());
                let _ = write!(out, ") -> ");
                match cmd.reply_shape() {
                    ReplyShape::Unit => {
                        let _ = writeln!(out, "unit");
                    }
                    ReplyShape::Single(name) => {
                        let _ = writeln!(out, "single {name}");
                    }
                    ReplyShape::Named(names) => {
                        let _ = writeln!(out, "named ({})", names.join(", "));
                    }
                }
            }
            for ev in &domain.events {
                let _ = write!(out, "  event {}(", ev.method());
                render_fields(&mut out, ev.params());
                let _ = writeln!(out, ")");
            }
        }
        out
    }
}

fn render_fields(out: &mut String, fields: &[FieldSpec]) {
    for (i, f) in fields.iter().enumerate() {
        let sep = if i == 0 { "" } else { ", " };
        let opt = if f.optional { "?" } else { "" };
        let _ = write!(out, "{sep}{}{opt}: {:?}", f.local_name, f.ty);
    }
}

fn fields(params: &[Param], domain: &str, container: &str) -> Result<Vec<FieldSpec>> {
    params
        .iter()
        .map(|p| {
            Ok(FieldSpec {
                name: p.name.clone(),
                local_name: local_ident(&p.name),
                ty: qualify(p.ty.resolve(container)?, domain),
                optional: p.optional,
            })
        })
        .collect()
}

/// Prefixes domain-local references with their declaring domain.
fn qualify(ty: Type, domain: &str) -> Type {
    match ty {
        Type::Ref(name) if !name.contains('.') => Type::Ref(format!("{domain}.{name}")),
        Type::ArrayOf(items) => Type::ArrayOf(Box::new(qualify(*items, domain))),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_escape_deterministically() {
        assert_eq!(local_ident("type"), "type_");
        assert_eq!(local_ident("override"), "override_");
        assert_eq!(local_ident("targetId"), "target_id");
        assert_eq!(local_ident("enableBeginFrameControl"), "enable_begin_frame_control");
        assert_eq!(type_ident("targetInfo"), "TargetInfo");
        assert_eq!(type_ident("TargetID"), "TargetId");
    }

    #[test]
    fn local_refs_qualify_arrays_too() {
        let ty = qualify(
            Type::ArrayOf(Box::new(Type::Ref("TargetInfo".into()))),
            "Target",
        );
        assert_eq!(ty, Type::ArrayOf(Box::new(Type::Ref("Target.TargetInfo".into()))));
        let already = qualify(Type::Ref("Network.Cookie".into()), "Storage");
        assert_eq!(already, Type::Ref("Network.Cookie".into()));
    }
}
