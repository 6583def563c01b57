//! Generator configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// How event literals that break the naming convention are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralPolicy {
    /// Warn and emit the literal unchanged.
    #[default]
    Lenient,
    /// Fail the owning block.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
/// Options controlling Go declaration output.
pub struct GenOptions {
    /// Go package clause; derived from the schema file stem when unset.
    pub package: Option<String>,
    /// Import path of the bridge package providing the host handle type.
    pub js_import: String,
    /// Name of the host-handle field in every generated struct.
    pub handle_field: String,
    /// Type of the host handle, also used for unspecified host objects.
    pub handle_type: String,
    /// Embed the handle anonymously instead of naming it.
    pub embed_handle: bool,
    pub literal_policy: LiteralPolicy,
    /// Render descriptions, platforms and process context as comments.
    pub docs: bool,
    /// Emit a `<Name>Static` struct for class constructors and static methods.
    pub lower_statics: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            package: None,
            js_import: "github.com/gopherjs/gopherjs/js".to_string(),
            handle_field: "HostHandle".to_string(),
            handle_type: "*js.Object".to_string(),
            embed_handle: false,
            literal_policy: LiteralPolicy::Lenient,
            docs: true,
            lower_statics: false,
        }
    }
}

impl GenOptions {
    /// Loads options from a JSON file; missing keys keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            GenError::Config(format!("failed to read '{}': {e}", path.display()))
        })?;
        let options: GenOptions = serde_json::from_str(&text).map_err(|e| {
            GenError::Config(format!("invalid options in '{}': {e}", path.display()))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if let Some(package) = &self.package {
            if !is_go_package_name(package) {
                return Err(GenError::Config(format!(
                    "'{package}' is not a valid Go package name"
                )));
            }
        }
        if !self.embed_handle && self.handle_field.trim().is_empty() {
            return Err(GenError::Config(
                "handle_field must be set unless embed_handle is enabled".to_string(),
            ));
        }
        if self.handle_type.trim().is_empty() {
            return Err(GenError::Config("handle_type must not be empty".to_string()));
        }
        Ok(())
    }

    /// Package clause for a schema file, preferring the configured name.
    pub fn package_for(&self, stem: Option<&str>) -> String {
        if let Some(package) = &self.package {
            return package.clone();
        }
        let derived: String = stem
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if derived.is_empty() || derived.starts_with(|c: char| c.is_ascii_digit()) {
            "api".to_string()
        } else {
            derived
        }
    }

    /// Go field name the host handle occupies in a struct.
    ///
    /// An embedded `*js.Object` is addressed as `Object`.
    pub(crate) fn handle_member(&self) -> String {
        if !self.embed_handle {
            return self.handle_field.clone();
        }
        let ty = self.handle_type.trim_start_matches('*');
        ty.rsplit('.').next().unwrap_or(ty).to_string()
    }

    /// Host-handle line inside a struct body.
    pub(crate) fn handle_decl(&self) -> String {
        if self.embed_handle {
            self.handle_type.clone()
        } else {
            format!("{} {}", self.handle_field, self.handle_type)
        }
    }
}

fn is_go_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
