//! Per-block naming context for generated declarations.
//!
//! A [`Context`] owns the namespace of one block. Nested composites and
//! enumerated constants discovered while the block is emitted are given unique
//! names here and queued; their declarations are written after the block's
//! primary declaration by [`Context::decl_new_types`].
//!
//! Blocks share one output file, so a context also honours the top-level names
//! already declared by earlier blocks. It never adds to that set; the driver
//! does once a block is committed.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::ast::{Base, Property, RawType};
use crate::error::GenError;
use crate::options::GenOptions;
use crate::sink::Sink;
use crate::symbols::{base_sym, ident};

/// A declaration waiting to be emitted.
#[derive(Debug, Clone)]
pub enum Pending<'a> {
    /// Composite struct or func type for a nested property.
    Type { name: String, property: &'a Property },
    /// Named string type enumerating possible values.
    Const { name: String, property: &'a Property },
}

pub struct Context<'a, 's> {
    block: &'a Base,
    block_name: String,
    options: &'a GenOptions,
    reserved: &'s HashSet<String>,
    sink: &'s mut dyn Sink,
    out: String,
    used: HashSet<String>,
    shapes: HashMap<String, String>,
    pending: VecDeque<Pending<'a>>,
    warnings: Vec<String>,
    closed: bool,
}

impl<'a, 's> Context<'a, 's> {
    /// Opens the sink for `block` and reserves the block's own type name.
    ///
    /// `reserved` holds the top-level names declared by earlier blocks of the
    /// same file; none of them is handed out again.
    pub fn new(
        block: &'a Base,
        options: &'a GenOptions,
        reserved: &'s HashSet<String>,
        sink: &'s mut dyn Sink,
    ) -> Result<Self, GenError> {
        sink.open(&block.name)?;

        let mut used = HashSet::new();
        let block_name = unique_outside(&base_sym(block), reserved, &mut used);
        if block_name != base_sym(block) {
            debug!(block = %block.name, name = %block_name, "block name taken by an earlier block");
        }
        Ok(Self {
            block,
            block_name,
            options,
            reserved,
            sink,
            out: String::new(),
            used,
            shapes: HashMap::new(),
            pending: VecDeque::new(),
            warnings: Vec::new(),
            closed: false,
        })
    }

    pub fn block(&self) -> &'a Base {
        self.block
    }

    /// Declared type name of the block.
    pub fn block_name(&self) -> &str {
        &self.block_name
    }

    pub fn options(&self) -> &'a GenOptions {
        self.options
    }

    pub fn push_str(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub fn push(&mut self, ch: char) {
        self.out.push(ch);
    }

    /// Text emitted so far for this block.
    pub fn text(&self) -> &str {
        &self.out
    }

    /// Reserves `base` (or an ordinal variant of it) as a top-level name.
    pub fn reserve(&mut self, base: &str) -> String {
        unique_outside(base, self.reserved, &mut self.used)
    }

    /// Top-level names this block has declared so far.
    pub fn declared_names(&self) -> &HashSet<String> {
        &self.used
    }

    /// Allocates a type name for a nested composite or function property.
    ///
    /// A property whose name and shape match an earlier allocation reuses it.
    pub fn new_type(&mut self, property: &'a Property, scope: &str) -> String {
        let key = format!("type:{scope}:{}", shape_key(property));
        if let Some(existing) = self.shapes.get(&key) {
            debug!(block = %self.block.name, name = %existing, "reusing nested type");
            return existing.clone();
        }
        let name = self.reserve(&format!("{scope}{}", ident(&property.base.name)));
        debug!(block = %self.block.name, name = %name, "allocated nested type");
        self.shapes.insert(key, name.clone());
        self.pending.push_back(Pending::Type {
            name: name.clone(),
            property,
        });
        name
    }

    /// Allocates a type name for an enumerated constant set.
    pub fn new_const(&mut self, property: &'a Property, scope: &str) -> String {
        let key = format!("const:{scope}:{}", shape_key(property));
        if let Some(existing) = self.shapes.get(&key) {
            debug!(block = %self.block.name, name = %existing, "reusing constant type");
            return existing.clone();
        }
        let name = self.reserve(&format!("{scope}{}", ident(&property.base.name)));
        debug!(block = %self.block.name, name = %name, "allocated constant type");
        self.shapes.insert(key, name.clone());
        self.pending.push_back(Pending::Const {
            name: name.clone(),
            property,
        });
        name
    }

    /// Number of declarations still waiting to be emitted.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Emits every pending declaration in discovery order.
    ///
    /// Declarations discovered while emitting pending ones are queued behind
    /// them and emitted in the same call. Returns how many were emitted.
    pub fn decl_new_types(&mut self) -> usize {
        let mut emitted = 0;
        while let Some(pending) = self.pending.pop_front() {
            crate::emit::decl_pending(self, pending);
            emitted += 1;
        }
        emitted
    }

    /// Records a non-fatal diagnostic for this block.
    pub fn warn(&mut self, message: String) {
        warn!(block = %self.block.name, "{message}");
        self.warnings.push(message);
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Commits the block's text to the sink.
    ///
    /// On failure the block is abandoned; nothing partial is kept.
    pub fn close(mut self) -> Result<(), GenError> {
        self.closed = true;
        let result = self.sink.commit(&self.block.name, &self.out);
        if result.is_err() {
            self.sink.abandon(&self.block.name);
        }
        result
    }
}

impl Drop for Context<'_, '_> {
    fn drop(&mut self) {
        if !self.closed {
            debug!(block = %self.block.name, "abandoning unfinished block");
            self.sink.abandon(&self.block.name);
        }
    }
}

/// Structural fingerprint of a property; descriptions are ignored.
fn shape_key(property: &Property) -> String {
    let mut out = String::new();
    write_shape(property, &mut out);
    out
}

fn write_shape(property: &Property, out: &mut String) {
    out.push_str(&property.base.name);
    out.push(':');
    match &property.base.raw_type {
        RawType::Absent => {}
        RawType::Single(name) => out.push_str(name),
        RawType::List(names) => out.push_str(&names.join("|")),
        RawType::Malformed(value) => out.push_str(&value.to_string()),
    }
    if !property.properties.is_empty() {
        out.push('{');
        for member in &property.properties {
            write_shape(member, out);
            out.push(',');
        }
        out.push('}');
    }
    if !property.parameters.is_empty() {
        out.push('(');
        for param in &property.parameters {
            write_shape(param, out);
            out.push(',');
        }
        out.push(')');
    }
    if let Some(values) = &property.possible_values {
        out.push('[');
        for value in values {
            out.push_str(&value.base.name);
            out.push('=');
            out.push_str(value.literal());
            out.push(',');
        }
        out.push(']');
    }
}

/// Like [`unique_identifier`], also skipping every name in `reserved`.
fn unique_outside(base: &str, reserved: &HashSet<String>, used: &mut HashSet<String>) -> String {
    if !reserved.contains(base) && used.insert(base.to_string()) {
        return base.to_string();
    }

    let mut idx = 2usize;
    loop {
        let candidate = format!("{base}{idx}");
        if !reserved.contains(&candidate) && used.insert(candidate.clone()) {
            return candidate;
        }
        idx += 1;
    }
}

/// Returns `base`, or `base2`, `base3`, ... if taken, and marks it used.
pub(crate) fn unique_identifier(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }

    let mut idx = 2usize;
    loop {
        let candidate = format!("{base}{idx}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        idx += 1;
    }
}
