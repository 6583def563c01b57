//! Output destinations for generated block text.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::GenError;

/// Destination receiving one committed text unit per block.
///
/// A block is opened before emission starts and is then either committed or
/// abandoned, never both. Text of an abandoned block must not reach the output.
pub trait Sink {
    fn open(&mut self, block: &str) -> Result<(), GenError>;
    /// Writes and flushes the full text of an opened block.
    fn commit(&mut self, block: &str, text: &str) -> Result<(), GenError>;
    fn abandon(&mut self, block: &str);
}

/// Collects committed blocks in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    blocks: Vec<(String, String)>,
    open: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed `(block, text)` pairs in commit order.
    pub fn blocks(&self) -> &[(String, String)] {
        &self.blocks
    }

    /// Concatenated text of every committed block.
    pub fn text(&self) -> String {
        self.blocks.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl Sink for MemorySink {
    fn open(&mut self, block: &str) -> Result<(), GenError> {
        if let Some(current) = &self.open {
            return Err(GenError::sink(
                block,
                format!("block '{current}' is still open"),
            ));
        }
        self.open = Some(block.to_string());
        Ok(())
    }

    fn commit(&mut self, block: &str, text: &str) -> Result<(), GenError> {
        match self.open.take() {
            Some(current) if current == block => {
                self.blocks.push((current, text.to_string()));
                Ok(())
            }
            _ => Err(GenError::sink(block, "block was not opened")),
        }
    }

    fn abandon(&mut self, block: &str) {
        if self.open.as_deref() == Some(block) {
            self.open = None;
        }
    }
}

/// Appends committed blocks to one output file.
///
/// The file is created, with `header` as its first text, when the first block
/// is committed, so a schema whose blocks all fail leaves no file behind.
pub struct FileSink {
    path: PathBuf,
    header: String,
    writer: Option<BufWriter<File>>,
    committed: usize,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, header: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            header: header.into(),
            writer: None,
            committed: 0,
        }
    }

    /// Number of blocks written so far.
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), GenError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn create_parent(&self, block: &str) -> Result<(), GenError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .map_err(|e| {
                    GenError::sink(block, format!("failed to create '{}': {e}", parent.display()))
                }),
            _ => Ok(()),
        }
    }

    fn writer(&mut self, block: &str) -> Result<&mut BufWriter<File>, GenError> {
        if self.writer.is_none() {
            self.create_parent(block)?;
            let file = File::create(&self.path).map_err(|e| {
                GenError::sink(block, format!("failed to create '{}': {e}", self.path.display()))
            })?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(self.header.as_bytes())
                .map_err(|e| GenError::sink(block, e))?;
            self.writer = Some(writer);
        }
        self.writer
            .as_mut()
            .ok_or_else(|| GenError::sink(block, "output file is closed"))
    }
}

impl Sink for FileSink {
    fn open(&mut self, block: &str) -> Result<(), GenError> {
        if self.writer.is_none() {
            self.create_parent(block)?;
        }
        Ok(())
    }

    fn commit(&mut self, block: &str, text: &str) -> Result<(), GenError> {
        let writer = self.writer(block)?;
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| GenError::sink(block, e))?;
        self.committed += 1;
        Ok(())
    }

    fn abandon(&mut self, _block: &str) {}
}
