//! Classification of raw type tags and the basic type mapping.

use crate::ast::RawType;

/// Declaration kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Module,
    Class,
    Structure,
    Object,
    Function,
    Basic,
}

impl Kind {
    /// Classifies a raw type tag. Only the first member of a union is used.
    pub fn classify(raw: &RawType) -> Kind {
        match raw.resolved() {
            Some("Module") => Kind::Module,
            Some("Class") => Kind::Class,
            Some("Structure") => Kind::Structure,
            Some("Object") => Kind::Object,
            Some("Function") => Kind::Function,
            _ => Kind::Basic,
        }
    }

    pub fn is_basic(self) -> bool {
        self == Kind::Basic
    }

    /// Kinds lowered to a named composite struct when nested.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            Kind::Module | Kind::Class | Kind::Structure | Kind::Object
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Module => "Module",
            Kind::Class => "Class",
            Kind::Structure => "Structure",
            Kind::Object => "Object",
            Kind::Function => "Function",
            Kind::Basic => "Basic",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a basic type tag to a Go primitive.
///
/// Unknown tags, and malformed ones, map to `handle_type`: the schema refers to
/// a host object it does not describe further.
pub fn basic_type<'a>(raw: &RawType, handle_type: &'a str) -> &'a str {
    match raw.resolved() {
        Some("") | Some("String") | Some("STRING") => "string",
        Some("Integer") | Some("INTEGER") => "int64",
        Some("Number") | Some("NUMBER") | Some("Double") | Some("DOUBLE") | Some("Float")
        | Some("FLOAT") => "float64",
        Some("Boolean") | Some("BOOLEAN") => "bool",
        _ => handle_type,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn single(name: &str) -> RawType {
        RawType::Single(name.to_string())
    }

    #[test]
    fn absent_type_is_basic() {
        assert_eq!(Kind::classify(&RawType::Absent), Kind::Basic);
    }

    #[test]
    fn list_type_uses_first_element() {
        let raw = RawType::List(vec!["Function".to_string(), "Boolean".to_string()]);
        assert_eq!(Kind::classify(&raw), Kind::Function);
    }

    #[test]
    fn unrecognized_names_are_basic() {
        assert_eq!(Kind::classify(&single("module")), Kind::Basic);
        assert_eq!(Kind::classify(&single("BrowserWindow")), Kind::Basic);
        assert_eq!(Kind::classify(&RawType::Malformed(json!(1))), Kind::Basic);
        assert_eq!(Kind::classify(&single("Structure")), Kind::Structure);
    }

    #[test]
    fn only_named_shapes_are_composite() {
        for kind in [Kind::Module, Kind::Class, Kind::Structure, Kind::Object] {
            assert!(kind.is_composite(), "{kind}");
            assert!(!kind.is_basic(), "{kind}");
        }
        assert!(!Kind::Function.is_composite());
        assert!(!Kind::Basic.is_composite());
        assert!(Kind::Basic.is_basic());
    }

    #[test]
    fn basic_types_map_to_go_primitives() {
        let handle = "*js.Object";
        assert_eq!(basic_type(&RawType::Absent, handle), "string");
        assert_eq!(basic_type(&single("String"), handle), "string");
        assert_eq!(basic_type(&single("Integer"), handle), "int64");
        assert_eq!(basic_type(&single("Double"), handle), "float64");
        assert_eq!(basic_type(&single("Float"), handle), "float64");
        assert_eq!(basic_type(&single("Number"), handle), "float64");
        assert_eq!(basic_type(&single("Boolean"), handle), "bool");
        assert_eq!(basic_type(&single("NativeImage"), handle), "*js.Object");
        assert_eq!(
            basic_type(&RawType::Malformed(json!({ "a": 1 })), handle),
            "*js.Object"
        );
    }
}
