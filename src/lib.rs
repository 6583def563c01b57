pub mod ast;
pub mod driver;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod kind;
pub mod options;
pub mod registry;
pub mod sink;
pub mod symbols;

use std::path::{Path, PathBuf};

pub use ast::{ApiFile, Base, Block, Event, Method, PossibleValue, Property, RawType};
pub use driver::{generate_blocks, BlockFailure, GenerationReport};
pub use error::GenError;
pub use fetch::{read_source, resolve_sources, FetchContext, SchemaSource};
pub use kind::{basic_type, Kind};
pub use options::{GenOptions, LiteralPolicy};
pub use sink::{FileSink, MemorySink, Sink};

/// Parses schema text into blocks.
///
/// Fails when the text is not a JSON array of block objects or holds no blocks.
pub fn parse_api_file(input: &str) -> Result<ApiFile, GenError> {
    let file: ApiFile =
        serde_json::from_str(input).map_err(|e| GenError::Parse(e.to_string()))?;
    if file.blocks.is_empty() {
        return Err(GenError::EmptySchema);
    }
    Ok(file)
}

/// File header: provenance comment, input digest, package clause and import.
pub fn render_header(source: &str, input: &str, package: &str, options: &GenOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// Code generated by apidecl from {source}. DO NOT EDIT.\n"
    ));
    out.push_str(&format!(
        "// Source digest: {}\n",
        fetch::compute_sha256(input.as_bytes())
    ));
    out.push('\n');
    out.push_str(&format!("package {package}\n"));
    out.push('\n');
    out.push_str(&format!("import \"{}\"\n", options.js_import));
    out
}

#[derive(Debug, Clone)]
/// In-memory generation result.
pub struct GeneratedFile {
    /// Header followed by every generated block.
    pub text: String,
    pub report: GenerationReport,
}

/// Generates Go declarations from in-memory schema text.
pub fn generate_go_bindings(input: &str, options: &GenOptions) -> Result<GeneratedFile, GenError> {
    options.validate()?;
    let file = parse_api_file(input)?;
    let mut sink = MemorySink::new();
    let report = generate_blocks(&file, &mut sink, options);

    let package = options.package_for(None);
    let mut text = render_header("<memory>", input, &package, options);
    text.push_str(&sink.text());
    Ok(GeneratedFile { text, report })
}

/// Generates `<out_dir>/<stem>.go` from one schema source's text.
///
/// Blocks that fail are reported and left out of the file. No file is written
/// when every block fails.
pub fn generate_go_file(
    source: &SchemaSource,
    input: &str,
    out_dir: &Path,
    options: &GenOptions,
) -> Result<(PathBuf, GenerationReport), GenError> {
    options.validate()?;
    let file = parse_api_file(input)?;
    let stem = source.stem();
    let package = options.package_for(stem.as_deref());
    let out_path = out_dir.join(format!("{}.go", stem.as_deref().unwrap_or("api")));

    let header = render_header(&source.display_id(), input, &package, options);
    let mut sink = FileSink::new(&out_path, header);
    let report = generate_blocks(&file, &mut sink, options);
    sink.finish()?;
    Ok((out_path, report))
}

/// Reads a local schema file and generates its Go file into `out_dir`.
pub fn generate_go_bindings_from_path(
    path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    options: &GenOptions,
) -> Result<(PathBuf, GenerationReport), GenError> {
    let source = SchemaSource::Local(path.as_ref().to_path_buf());
    let input = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        GenError::Parse(format!("failed to read '{}': {e}", path.as_ref().display()))
    })?;
    generate_go_file(&source, &input, out_dir.as_ref(), options)
}
