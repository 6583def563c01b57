//! Go declaration emission, one procedure per declaration kind.

use std::collections::HashSet;

use crate::ast::{Base, Block, Event, Method, Property, RawType};
use crate::error::GenError;
use crate::kind::{basic_type, Kind};
use crate::options::LiteralPolicy;
use crate::registry::{unique_identifier, Context, Pending};
use crate::symbols::{
    base_sym, doc_lines, escape_string, escape_tag, ident, is_suspicious_event_literal, scope_sym,
};

/// Whether a declared member carries a `js:"..."` source-name tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    /// Struct field mapped onto a host object property.
    Field,
    /// Function parameter or result; never tagged.
    Parameter,
}

/// Emits the primary declaration of a block.
///
/// Pending nested declarations are left queued in `ctx`.
pub fn decl_block<'a>(ctx: &mut Context<'a, '_>, block: &'a Block) -> Result<(), GenError> {
    check_version(ctx, block);
    match block.base.kind() {
        Kind::Module => decl_module(ctx, block),
        Kind::Class => decl_class(ctx, block),
        Kind::Structure | Kind::Object | Kind::Function | Kind::Basic => {
            decl_other(ctx, block);
            Ok(())
        }
    }
}

fn decl_module<'a>(ctx: &mut Context<'a, '_>, block: &'a Block) -> Result<(), GenError> {
    decl_events(ctx, &block.events)?;
    decl_struct_head(ctx, block);
    decl_members(ctx, &block.properties, &block.methods, Member::Field);
    ctx.push_str("}\n");
    Ok(())
}

fn decl_class<'a>(ctx: &mut Context<'a, '_>, block: &'a Block) -> Result<(), GenError> {
    decl_events(ctx, &block.instance_events)?;
    decl_struct_head(ctx, block);
    decl_members(
        ctx,
        &block.instance_properties,
        &block.instance_methods,
        Member::Field,
    );
    ctx.push_str("}\n");
    if ctx.options().lower_statics {
        decl_statics(ctx, block);
    }
    Ok(())
}

fn decl_other<'a>(ctx: &mut Context<'a, '_>, block: &'a Block) {
    let member = if block.base.kind() == Kind::Function {
        Member::Parameter
    } else {
        Member::Field
    };
    decl_struct_head(ctx, block);
    decl_members(ctx, &block.properties, &[], member);
    ctx.push_str("}\n");
}

fn decl_struct_head(ctx: &mut Context<'_, '_>, block: &Block) {
    let name = ctx.block_name().to_string();
    ctx.push('\n');
    if ctx.options().docs {
        push_doc(ctx, &doc_lines(&block.base), "");
    }
    let handle = ctx.options().handle_decl();
    ctx.push_str(&format!("type {name} struct {{\n\t{handle}\n"));
}

/// Writes struct fields for properties followed by methods, in schema order.
fn decl_members<'a>(
    ctx: &mut Context<'a, '_>,
    properties: &'a [Property],
    methods: &'a [Method],
    member: Member,
) {
    let scope = scope_sym(ctx.block());
    let mut used = HashSet::new();
    used.insert(ctx.options().handle_member());

    for property in properties {
        let name = unique_identifier(&base_sym(&property.base), &mut used);
        let ty = property_type(ctx, property, &scope);
        push_field(ctx, &property.base, &name, &ty, member);
    }
    for method in methods {
        let name = unique_identifier(&base_sym(&method.base), &mut used);
        let ty = method_type(ctx, method, &scope);
        push_field(ctx, &method.base, &name, &ty, member);
    }
}

fn push_field(
    ctx: &mut Context<'_, '_>,
    base: &Base,
    name: &str,
    ty: &str,
    member: Member,
) {
    if ctx.options().docs {
        let lines = doc_lines(base);
        push_doc(ctx, &lines, "\t");
    }
    match member {
        Member::Field => ctx.push_str(&format!(
            "\t{name} {ty} `js:\"{}\"`\n",
            escape_tag(&base.name)
        )),
        Member::Parameter => ctx.push_str(&format!("\t{name} {ty}\n")),
    }
}

fn push_doc(ctx: &mut Context<'_, '_>, lines: &[String], indent: &str) {
    for line in lines {
        ctx.push_str(indent);
        ctx.push_str(line);
        ctx.push('\n');
    }
}

/// Go type for a property, allocating named types in the registry as needed.
fn property_type<'a>(ctx: &mut Context<'a, '_>, property: &'a Property, scope: &str) -> String {
    if property.possible_values.is_some() {
        return ctx.new_const(property, scope);
    }
    let kind = property.base.kind();
    if kind.is_basic() {
        if let RawType::Malformed(value) = &property.base.raw_type {
            let handle = ctx.options().handle_type.clone();
            ctx.warn(format!(
                "property '{}' has malformed type {value}; using {handle}",
                property.base.name
            ));
        }
        return basic_type(&property.base.raw_type, &ctx.options().handle_type).to_string();
    }
    ctx.new_type(property, scope)
}

/// `func(params,) (result)` signature for a method.
fn method_type<'a>(ctx: &mut Context<'a, '_>, method: &'a Method, scope: &str) -> String {
    let method_scope = format!("{scope}{}", ident(&method.base.name));
    let result = method
        .returns
        .as_ref()
        .map(std::slice::from_ref)
        .unwrap_or_default();
    signature(ctx, &method.parameters, result, &method_scope)
}

fn signature<'a>(
    ctx: &mut Context<'a, '_>,
    parameters: &'a [Property],
    result: &'a [Property],
    scope: &str,
) -> String {
    let mut used = HashSet::new();
    let mut out = String::from("func(");
    let mut params = Vec::with_capacity(parameters.len());
    for param in parameters {
        let name = unique_identifier(&base_sym(&param.base), &mut used);
        let ty = property_type(ctx, param, scope);
        params.push(format!("{name} {ty},"));
    }
    out.push_str(&params.join(" "));
    out.push(')');
    if let Some(returns) = result.first() {
        let name = unique_identifier(&base_sym(&returns.base), &mut used);
        let ty = property_type(ctx, returns, scope);
        out.push_str(&format!(" ({name} {ty})"));
    }
    out
}

/// Constant block binding `Evt<Block><Event>` to each raw event name.
fn decl_events(ctx: &mut Context<'_, '_>, events: &[Event]) -> Result<(), GenError> {
    if events.is_empty() {
        return Ok(());
    }
    let scope = scope_sym(ctx.block());
    let mut lines = Vec::with_capacity(events.len());

    for event in events {
        let literal = &event.base.name;
        if is_suspicious_event_literal(literal) {
            match ctx.options().literal_policy {
                LiteralPolicy::Strict => {
                    return Err(GenError::SuspiciousLiteral {
                        block: ctx.block().name.clone(),
                        event: ident(literal),
                        literal: literal.clone(),
                    });
                }
                LiteralPolicy::Lenient => ctx.warn(format!(
                    "event literal {literal:?} does not look like an event name; emitted unchanged"
                )),
            }
        }
        let name = ctx.reserve(&format!("Evt{scope}{}", ident(literal)));
        lines.push((name, event));
    }

    ctx.push_str("\nconst (\n");
    for (name, event) in lines {
        if ctx.options().docs {
            let mut docs = doc_lines(&event.base);
            if !event.returns.is_empty() {
                docs.push("// Returns:".to_string());
                for payload in &event.returns {
                    let ty = payload.base.raw_type.resolved().unwrap_or("Object");
                    docs.push(format!("//   {} {ty}", payload.base.name).trim_end().to_string());
                }
            }
            push_doc(ctx, &docs, "\t");
        }
        ctx.push_str(&format!(
            "\t{name} = \"{}\"\n",
            escape_string(&event.base.name)
        ));
    }
    ctx.push_str(")\n");
    Ok(())
}

/// Constructor and static methods of a class, as a separate struct.
fn decl_statics<'a>(ctx: &mut Context<'a, '_>, block: &'a Block) {
    if block.constructor_method.is_none() && block.static_methods.is_empty() {
        return;
    }
    let class_name = ctx.block_name().to_string();
    let name = ctx.reserve(&format!("{class_name}Static"));
    let scope = scope_sym(ctx.block());
    let handle = ctx.options().handle_decl();

    let mut fields = Vec::new();
    let mut used = HashSet::new();
    used.insert(ctx.options().handle_member());
    if let Some(constructor) = &block.constructor_method {
        let field = unique_identifier("New", &mut used);
        let mut sig = signature(ctx, &constructor.parameters, &[], &format!("{scope}New"));
        sig.push_str(&format!(" (Obj *{class_name})"));
        fields.push(format!("\t{field} {sig}\n"));
    }
    for method in &block.static_methods {
        let field = unique_identifier(&base_sym(&method.base), &mut used);
        let sig = method_type(ctx, method, &scope);
        fields.push(format!(
            "\t{field} {sig} `js:\"{}\"`\n",
            escape_tag(&method.base.name)
        ));
    }

    ctx.push_str(&format!(
        "\n// {name} exposes the constructor and static methods of {class_name}.\ntype {name} struct {{\n\t{handle}\n"
    ));
    for field in fields {
        ctx.push_str(&field);
    }
    ctx.push_str("}\n");
}

/// Emits one queued nested declaration.
pub(crate) fn decl_pending<'a>(ctx: &mut Context<'a, '_>, pending: Pending<'a>) {
    match pending {
        Pending::Type { name, property } => {
            if property.base.kind().is_composite() {
                decl_nested_struct(ctx, &name, property);
            } else {
                decl_func_type(ctx, &name, property);
            }
        }
        Pending::Const { name, property } => decl_const(ctx, &name, property),
    }
}

fn decl_nested_struct<'a>(ctx: &mut Context<'a, '_>, name: &str, property: &'a Property) {
    ctx.push('\n');
    if ctx.options().docs {
        push_doc(ctx, &doc_lines(&property.base), "");
    }
    let handle = ctx.options().handle_decl();
    ctx.push_str(&format!("type {name} struct {{\n\t{handle}\n"));

    let mut used = HashSet::new();
    used.insert(ctx.options().handle_member());
    for member in &property.properties {
        let field = unique_identifier(&base_sym(&member.base), &mut used);
        let ty = property_type(ctx, member, name);
        push_field(ctx, &member.base, &field, &ty, Member::Field);
    }
    ctx.push_str("}\n");
}

fn decl_func_type<'a>(ctx: &mut Context<'a, '_>, name: &str, property: &'a Property) {
    ctx.push('\n');
    if ctx.options().docs {
        push_doc(ctx, &doc_lines(&property.base), "");
    }
    let sig = signature(ctx, &property.parameters, &[], name);
    ctx.push_str(&format!("type {name} {sig}\n"));
}

fn decl_const(ctx: &mut Context<'_, '_>, name: &str, property: &Property) {
    ctx.push('\n');
    if ctx.options().docs {
        push_doc(ctx, &doc_lines(&property.base), "");
    }
    ctx.push_str(&format!("type {name} string\n"));

    let values = property.possible_values.as_deref().unwrap_or_default();
    if values.is_empty() {
        return;
    }
    ctx.push_str("\nconst (\n");
    for value in values {
        let member_base = if value.base.name.is_empty() {
            value.literal()
        } else {
            &value.base.name
        };
        let member = ctx.reserve(&format!("{name}{}", ident(member_base)));
        if ctx.options().docs {
            push_doc(ctx, &doc_lines(&value.base), "\t");
        }
        ctx.push_str(&format!(
            "\t{member} {name} = \"{}\"\n",
            escape_string(value.literal())
        ));
    }
    ctx.push_str(")\n");
}

/// Warns when package metadata carries a version that is not semver.
fn check_version(ctx: &mut Context<'_, '_>, block: &Block) {
    let Some(version) = block.base.version.as_deref() else {
        return;
    };
    let trimmed = version.trim_start_matches('v');
    if let Err(e) = semver::Version::parse(trimmed) {
        ctx.warn(format!("version {version:?} is not valid semver: {e}"));
    }
}
