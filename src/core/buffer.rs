//! Buffer: text content, point and metadata.
//!
//! Text lives in a ropey `Rope`. The point is a char index. A buffer may carry
//! a local keymap, consulted between the overriding map and the global map.

use ropey::Rope;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::core::error::{EditorError, Result};
use crate::core::keymap::Keymap;

/// Key of a buffer in `EditorApp::buffers`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

#[derive(Debug)]
pub struct Buffer {
    rope: Rope,
    /// Char index of the insertion point
    point: usize,
    pub name: String,
    pub filename: Option<PathBuf>,
    /// Dirty flag (true if buffer has unsaved changes)
    pub modified: bool,
    /// Buffer-local keymap
    pub keymap: Option<Keymap>,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            rope: Rope::new(),
            point: 0,
            name: name.into(),
            filename: None,
            modified: false,
            keymap: None,
        }
    }

    /// Create a buffer from a string, point at the start
    pub fn from_string(name: impl Into<String>, content: impl AsRef<str>) -> Self {
        let mut buffer = Self::new(name);
        buffer.rope = Rope::from_str(content.as_ref());
        buffer
    }

    /// Load a buffer from a file. A missing file yields an empty buffer that
    /// will be created on first save.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if path.is_dir() {
            return Err(EditorError::message(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let rope = match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Rope::from_str(&text),
                // Invalid UTF-8: lossy conversion rather than refusing the file
                Err(err) => Rope::from_str(&String::from_utf8_lossy(err.as_bytes())),
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Rope::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            rope,
            point: 0,
            name,
            filename: Some(path.to_path_buf()),
            modified: false,
            keymap: None,
        })
    }

    // ==================== Content Access ====================

    /// Length in chars
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line contents without the trailing newline
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    pub fn point(&self) -> usize {
        self.point
    }

    pub fn set_point(&mut self, point: usize) {
        self.point = point.min(self.rope.len_chars());
    }

    /// Zero-based (line, column) of the point, column in chars.
    pub fn point_line_column(&self) -> (usize, usize) {
        let line = self.rope.char_to_line(self.point);
        (line, self.point - self.rope.line_to_char(line))
    }

    // ==================== Editing ====================

    /// Insert at point and advance past the inserted text.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.rope.insert(self.point, text);
        self.point += text.chars().count();
        self.modified = true;
    }

    /// Delete `n` chars after point, or `-n` chars before it when negative.
    /// Fails at the buffer boundary without deleting anything.
    pub fn delete_char(&mut self, n: i64) -> Result<()> {
        let count = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
        let (start, end) = if n >= 0 {
            if count > self.rope.len_chars() - self.point {
                return Err(EditorError::message("End of buffer"));
            }
            (self.point, self.point + count)
        } else {
            if count > self.point {
                return Err(EditorError::message("Beginning of buffer"));
            }
            (self.point - count, self.point)
        };
        if start < end {
            self.rope.remove(start..end);
            self.point = start;
            self.modified = true;
        }
        Ok(())
    }

    /// Move point `n` chars; negative moves backward. Stops at the boundary
    /// and reports it.
    pub fn forward_char(&mut self, n: i64) -> Result<()> {
        let target = i64::try_from(self.point).unwrap_or(i64::MAX).saturating_add(n);
        if target < 0 {
            self.point = 0;
            return Err(EditorError::message("Beginning of buffer"));
        }
        let len = self.rope.len_chars();
        if target as usize > len {
            self.point = len;
            return Err(EditorError::message("End of buffer"));
        }
        self.point = target as usize;
        Ok(())
    }

    pub fn beginning_of_line(&mut self) {
        let line = self.rope.char_to_line(self.point);
        self.point = self.rope.line_to_char(line);
    }

    pub fn end_of_line(&mut self) {
        let line = self.rope.char_to_line(self.point);
        let start = self.rope.line_to_char(line);
        let content = self.rope.line(line);
        let mut len = content.len_chars();
        while len > 0 && matches!(content.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        self.point = start + len;
    }

    // ==================== File Operations ====================

    /// Save buffer to its file
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .filename
            .clone()
            .ok_or_else(|| EditorError::NoFileName(self.name.clone()))?;

        // Write to temp file first for atomic save
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent)?;

        // Write content chunk by chunk to avoid large allocations
        for chunk in self.rope.chunks() {
            temp_file.write_all(chunk.as_bytes())?;
        }
        temp_file.flush()?;

        // sync_all() ensures data reaches disk before the atomic rename.
        temp_file.as_file().sync_all()?;

        // Atomic rename
        temp_file.persist(&path)?;

        self.modified = false;
        Ok(path)
    }
}
