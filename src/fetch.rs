//! Schema source resolution: local files, directories, and cached URLs.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::GenError;

/// Where one schema file is read from.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum SchemaSource {
    /// A local file path.
    Local(PathBuf),
    /// A remote URL with its local cache path.
    Remote { url: String, cache_path: PathBuf },
}

impl SchemaSource {
    /// Returns a display-friendly identifier (path or URL).
    pub fn display_id(&self) -> String {
        match self {
            SchemaSource::Local(p) => p.display().to_string(),
            SchemaSource::Remote { url, .. } => url.clone(),
        }
    }

    /// File stem used to name generated output.
    pub fn stem(&self) -> Option<String> {
        match self {
            SchemaSource::Local(p) => p.file_stem().map(|s| s.to_string_lossy().into_owned()),
            SchemaSource::Remote { url, .. } => {
                let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
                let last = path.trim_end_matches('/').rsplit('/').next()?;
                let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
                (!stem.is_empty()).then(|| stem.to_string())
            }
        }
    }
}

/// Settings for fetching remote schema files.
pub struct FetchContext {
    pub cache_dir: PathBuf,
    pub force_update: bool,
}

impl FetchContext {
    pub fn new(cache_dir: Option<PathBuf>, force_update: bool) -> Self {
        let cache_dir = cache_dir
            .or_else(|| std::env::var("APIDECL_CACHE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(default_cache_dir);
        Self {
            cache_dir,
            force_update,
        }
    }
}

/// Expands CLI inputs into schema sources.
///
/// Directories contribute every `*.json` file directly inside them, sorted by
/// file name so batch output is reproducible.
pub fn resolve_sources(inputs: &[String], ctx: &FetchContext) -> Result<Vec<SchemaSource>, GenError> {
    let mut out = Vec::new();
    for raw in inputs {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GenError::Config("input path must be a non-empty string".to_string()));
        }
        if is_url(trimmed) {
            out.push(SchemaSource::Remote {
                url: trimmed.to_string(),
                cache_path: url_cache_path(trimmed, &ctx.cache_dir),
            });
            continue;
        }

        let path = PathBuf::from(trimmed);
        if path.is_dir() {
            let mut files = Vec::new();
            for entry in fs::read_dir(&path)? {
                let entry_path = entry?.path();
                if entry_path.is_file()
                    && entry_path.extension().is_some_and(|ext| ext == "json")
                {
                    files.push(entry_path);
                }
            }
            files.sort();
            debug!(dir = %path.display(), count = files.len(), "expanded input directory");
            out.extend(files.into_iter().map(SchemaSource::Local));
        } else {
            out.push(SchemaSource::Local(path));
        }
    }
    Ok(out)
}

/// Reads the schema text of a source, fetching over HTTP if needed.
///
/// Remote sources are served from the disk cache unless `force_update` is set.
pub fn read_source(source: &SchemaSource, ctx: &FetchContext) -> Result<String, GenError> {
    match source {
        SchemaSource::Local(path) => fs::read_to_string(path).map_err(|e| {
            GenError::Parse(format!("failed to read '{}': {e}", path.display()))
        }),
        SchemaSource::Remote { url, cache_path } => {
            if !ctx.force_update {
                if let Ok(content) = fs::read_to_string(cache_path) {
                    debug!(url = %url, cache = %cache_path.display(), "using cached schema");
                    return Ok(content);
                }
            }

            info!(url = %url, "fetching schema");
            let content = fetch_url(url)?;

            fs::create_dir_all(cache_path.parent().unwrap_or(Path::new("."))).map_err(|e| {
                GenError::Fetch(format!("failed to create cache directory: {e}"))
            })?;
            fs::write(cache_path, &content).map_err(|e| {
                GenError::Fetch(format!(
                    "failed to write cache file '{}': {e}",
                    cache_path.display()
                ))
            })?;

            Ok(content)
        }
    }
}

/// Computes the SHA-256 hash of `content` and returns it in `sha256:hex` format.
pub fn compute_sha256(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn default_cache_dir() -> PathBuf {
    let base = if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache")
    } else {
        std::env::temp_dir().join(".cache")
    };
    base.join("apidecl")
}

fn url_cache_path(url: &str, cache_dir: &Path) -> PathBuf {
    let hash = compute_sha256(url.as_bytes());
    let hex = hash.strip_prefix("sha256:").unwrap_or(&hash);
    let short = &hex[..16.min(hex.len())];
    cache_dir.join(format!("{short}.json"))
}

fn fetch_url(url: &str) -> Result<String, GenError> {
    let body = ureq::get(url)
        .call()
        .map_err(|e| GenError::Fetch(format!("HTTP request to '{url}' failed: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| GenError::Fetch(format!("failed to read response body from '{url}': {e}")))?;
    Ok(body)
}
