//! Block-by-block generation over a parsed schema file.

use std::collections::HashSet;
use std::fmt;

use tracing::{info, warn};

use crate::ast::{ApiFile, Block};
use crate::emit::decl_block;
use crate::error::GenError;
use crate::options::GenOptions;
use crate::registry::Context;
use crate::sink::Sink;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A block whose output was abandoned.
pub struct BlockFailure {
    /// Raw schema name of the block.
    pub block: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
/// Outcome of generating one schema file.
pub struct GenerationReport {
    /// Raw names of blocks committed to the sink, in schema order.
    pub generated: Vec<String>,
    pub failed: Vec<BlockFailure>,
    /// Non-fatal diagnostics collected from generated blocks.
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merge(&mut self, other: GenerationReport) {
        self.generated.extend(other.generated);
        self.failed.extend(other.failed);
        self.warnings.extend(other.warnings);
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} block(s) generated, {} failed, {} warning(s)",
            self.generated.len(),
            self.failed.len(),
            self.warnings.len()
        )?;
        for failure in &self.failed {
            write!(f, "\n  skipped '{}': {}", failure.block, failure.reason)?;
        }
        Ok(())
    }
}

/// Generates every block of `file` into `sink`, in schema order.
///
/// A block that fails is logged and recorded in the report; the remaining
/// blocks are still generated. Top-level names declared by a committed block
/// are never reused by later blocks of the same file.
pub fn generate_blocks(
    file: &ApiFile,
    sink: &mut dyn Sink,
    options: &GenOptions,
) -> GenerationReport {
    let mut report = GenerationReport::default();
    let mut declared = HashSet::new();
    for block in &file.blocks {
        info!(block = %block.base.name, kind = %block.base.kind(), "processing block");
        match generate_block(block, sink, options, &declared, &mut report.warnings) {
            Ok(names) => {
                declared.extend(names);
                report.generated.push(block.base.name.clone());
            }
            Err(err) => {
                warn!(block = %block.base.name, "skipping block: {err}");
                report.failed.push(BlockFailure {
                    block: block.base.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    info!("{} of {} block(s) generated", report.generated.len(), file.blocks.len());
    report
}

fn generate_block(
    block: &Block,
    sink: &mut dyn Sink,
    options: &GenOptions,
    declared: &HashSet<String>,
    warnings: &mut Vec<String>,
) -> Result<HashSet<String>, GenError> {
    let mut ctx = Context::new(&block.base, options, declared, sink)?;
    let emitted = decl_block(&mut ctx, block);
    if emitted.is_ok() {
        ctx.decl_new_types();
    }
    warnings.extend(
        ctx.take_warnings()
            .into_iter()
            .map(|w| format!("{}: {w}", block.base.name)),
    );
    emitted?;
    let names = ctx.declared_names().clone();
    ctx.close()?;
    Ok(names)
}
