//! Transcript files
//!
//! A transcript is stored either as JSONL (one turn per line, append-only)
//! or as a single JSON array of turns. The `wire` module documents the turn shape.
//!
//! # Error Handling
//!
//! Loading follows the same resilience rules as the derivation:
//!
//! - **Malformed JSONL lines**: recorded in [`LoadedTranscript::warnings`],
//!   line skipped, loading continues.
//! - **Unsupported roles** (`system`, `tool`, `data`): skipped with a warning.
//! - **Unknown part types**: dropped silently.
//! - **Malformed JSON array**: the whole file is unreadable, so this is the
//!   one case that returns [`Error::Transcript`].
//!
//! I/O failures are always returned as errors.

mod wire;

use crate::error::{Error, Result};
use crate::types::Turn;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use wire::{decode_turn, encode_turn, Decoded};

/// On-disk layout of a transcript file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// One turn object per line
    Jsonl,
    /// A single array of turn objects
    JsonArray,
}

impl TranscriptFormat {
    /// Detect the format from existing content, falling back to the extension.
    pub fn detect(content: &str, path: &Path) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            return TranscriptFormat::JsonArray;
        }
        if trimmed.is_empty() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            return TranscriptFormat::JsonArray;
        }
        TranscriptFormat::Jsonl
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptFormat::Jsonl => "jsonl",
            TranscriptFormat::JsonArray => "json",
        }
    }
}

/// Result of parsing transcript content
#[derive(Debug, Default)]
pub struct LoadedTranscript {
    /// Turns in file order
    pub turns: Vec<Turn>,
    /// Records that were skipped (non-fatal)
    pub warnings: Vec<String>,
    /// SHA-256 of the raw content, hex encoded
    pub content_hash: String,
}

/// Hex SHA-256 of transcript bytes, used to detect changes between polls.
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Parse JSONL content. Never fails; bad lines become warnings.
pub fn parse_jsonl(content: &str) -> LoadedTranscript {
    let mut loaded = LoadedTranscript {
        content_hash: content_hash(content.as_bytes()),
        ..Default::default()
    };

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                loaded
                    .warnings
                    .push(format!("Line {}: JSON parse error: {}", line_number, e));
                continue;
            }
        };

        match decode_turn(value, format!("turn-{}", line_number)) {
            Decoded::Turn(turn) => loaded.turns.push(turn),
            Decoded::Skipped(reason) => loaded
                .warnings
                .push(format!("Line {}: skipped: {}", line_number, reason)),
        }
    }

    loaded
}

/// Parse a JSON array of turns.
pub fn parse_json_array(content: &str) -> std::result::Result<LoadedTranscript, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
    let mut loaded = LoadedTranscript {
        content_hash: content_hash(content.as_bytes()),
        ..Default::default()
    };

    for (index, value) in values.into_iter().enumerate() {
        match decode_turn(value, format!("turn-{}", index + 1)) {
            Decoded::Turn(turn) => loaded.turns.push(turn),
            Decoded::Skipped(reason) => loaded
                .warnings
                .push(format!("Entry {}: skipped: {}", index + 1, reason)),
        }
    }

    Ok(loaded)
}

/// Load a transcript file in either format.
pub fn load(path: &Path) -> Result<LoadedTranscript> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {}: {}", path.display(), e),
        ))
    })?;

    let loaded = match TranscriptFormat::detect(&content, path) {
        TranscriptFormat::Jsonl => parse_jsonl(&content),
        TranscriptFormat::JsonArray if content.trim().is_empty() => LoadedTranscript {
            content_hash: content_hash(content.as_bytes()),
            ..Default::default()
        },
        TranscriptFormat::JsonArray => {
            parse_json_array(&content).map_err(|e| Error::Transcript {
                path: path.to_path_buf(),
                message: format!("invalid JSON array: {}", e),
            })?
        }
    };

    for warning in &loaded.warnings {
        tracing::warn!(path = %path.display(), "{}", warning);
    }
    tracing::debug!(
        path = %path.display(),
        turns = loaded.turns.len(),
        warnings = loaded.warnings.len(),
        "Loaded transcript"
    );

    Ok(loaded)
}

/// Load a transcript, treating a missing file as an empty transcript.
pub fn load_or_empty(path: &Path) -> Result<LoadedTranscript> {
    if !path.exists() {
        return Ok(LoadedTranscript {
            content_hash: content_hash(&[]),
            ..Default::default()
        });
    }
    load(path)
}

/// Serialize turns in the given format.
pub fn to_string(turns: &[Turn], format: TranscriptFormat) -> Result<String> {
    let values: Vec<serde_json::Value> = turns.iter().map(encode_turn).collect();
    match format {
        TranscriptFormat::Jsonl => {
            let mut out = String::new();
            for value in &values {
                out.push_str(&serde_json::to_string(value)?);
                out.push('\n');
            }
            Ok(out)
        }
        TranscriptFormat::JsonArray => Ok(serde_json::to_string_pretty(&values)? + "\n"),
    }
}

/// Write the whole transcript, replacing the file.
///
/// Writes to a sibling temp file first so readers never see a half-written transcript.
pub fn save(path: &Path, turns: &[Turn], format: TranscriptFormat) -> Result<()> {
    write_atomic(path, &to_string(turns, format)?)
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Splice encoded turns before the closing bracket of a JSON array.
///
/// Existing entries are kept byte for byte, including roles and part types
/// that [`load`] skips.
fn append_to_array(path: &Path, existing: &str, turns: &[Turn]) -> Result<()> {
    let mut encoded = Vec::with_capacity(turns.len());
    for turn in turns {
        encoded.push(serde_json::to_string(&encode_turn(turn))?);
    }

    if existing.trim().is_empty() {
        return write_atomic(path, &format!("[\n{}\n]\n", encoded.join(",\n")));
    }

    let invalid = |message: String| Error::Transcript {
        path: path.to_path_buf(),
        message,
    };
    let entries: Vec<serde_json::Value> = serde_json::from_str(existing)
        .map_err(|e| invalid(format!("invalid JSON array: {}", e)))?;
    let head = existing
        .trim_end()
        .strip_suffix(']')
        .ok_or_else(|| invalid("JSON array has no closing bracket".to_string()))?
        .trim_end();

    let separator = if entries.is_empty() { "\n" } else { ",\n" };
    write_atomic(
        path,
        &format!("{}{}{}\n]\n", head, separator, encoded.join(",\n")),
    )
}

/// Append turns to a transcript file, keeping its existing format.
///
/// JSONL files get new lines appended; JSON arrays get the new entries
/// spliced in before the closing bracket. Past turns are never re-encoded.
pub fn append(path: &Path, turns: &[Turn]) -> Result<()> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    match TranscriptFormat::detect(&existing, path) {
        TranscriptFormat::Jsonl => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            if !existing.is_empty() && !existing.ends_with('\n') {
                file.write_all(b"\n")?;
            }
            file.write_all(to_string(turns, TranscriptFormat::Jsonl)?.as_bytes())?;
        }
        TranscriptFormat::JsonArray => append_to_array(path, &existing, turns)?,
    }

    tracing::debug!(path = %path.display(), appended = turns.len(), "Appended turns");
    Ok(())
}
