//! Findings store shared by every agent in a session

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Categories the prompts ask agents to use
pub const NOTE_CATEGORIES: [&str; 5] = ["credential", "vulnerability", "finding", "artifact", "recon"];

/// A saved finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// 1-based, derived from the store length at append time
    pub id: u64,
    pub content: String,
    pub category: String,
    /// Related host or IP; empty when not tied to a target
    #[serde(default)]
    pub target: String,
    pub timestamp: DateTime<Utc>,
}

/// Input for [`NoteStore::append`]
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    pub content: String,
    pub category: String,
    pub target: String,
}

impl NewNote {
    pub fn new(content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            category: category.into(),
            target: String::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

/// Query filters; `None` means no filtering on that field
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Substring match on the note target
    pub target: Option<String>,
    /// Keep only the most recent `limit` matches
    pub limit: Option<usize>,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| note.category == c)
            && self
                .target
                .as_deref()
                .map_or(true, |t| note.target.contains(t))
    }

    /// Apply the filter to notes in insertion order
    pub fn apply(&self, notes: &[Note]) -> Vec<Note> {
        let matching: Vec<Note> = notes.iter().filter(|n| self.matches(n)).cloned().collect();
        match self.limit {
            Some(limit) if matching.len() > limit => matching[matching.len() - limit..].to_vec(),
            _ => matching,
        }
    }
}

/// Append-only collection of findings
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Append a note, assigning its id and timestamp
    async fn append(&self, note: NewNote) -> Result<Note>;

    /// Notes matching the filter, oldest first
    async fn query(&self, filter: &NoteFilter) -> Result<Vec<Note>>;

    /// Every note, oldest first
    async fn all(&self) -> Result<Vec<Note>> {
        self.query(&NoteFilter::default()).await
    }

    /// Number of notes matching the filter, ignoring its limit
    async fn count(&self, filter: &NoteFilter) -> Result<usize> {
        let unlimited = NoteFilter {
            limit: None,
            ..filter.clone()
        };
        Ok(self.query(&unlimited).await?.len())
    }
}

fn stamp(id: u64, note: NewNote) -> Note {
    Note {
        id,
        content: note.content,
        category: note.category,
        target: note.target,
        timestamp: Utc::now(),
    }
}

/// Notes kept as one pretty-printed JSON array on disk
#[derive(Debug)]
pub struct JsonFileNoteStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileNoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Note>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, notes: &[Note]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(notes)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl NoteStore for JsonFileNoteStore {
    async fn append(&self, note: NewNote) -> Result<Note> {
        let _guard = self.lock.lock().await;
        let mut notes = self.load().await?;
        let note = stamp(notes.len() as u64 + 1, note);
        notes.push(note.clone());
        self.save(&notes).await?;
        tracing::debug!(id = note.id, category = %note.category, path = %self.path.display(), "note saved");
        Ok(note)
    }

    async fn query(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let _guard = self.lock.lock().await;
        Ok(filter.apply(&self.load().await?))
    }
}

/// In-process store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn append(&self, note: NewNote) -> Result<Note> {
        let mut notes = self.notes.lock().await;
        let note = stamp(notes.len() as u64 + 1, note);
        notes.push(note.clone());
        Ok(note)
    }

    async fn query(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        Ok(filter.apply(&self.notes.lock().await))
    }
}
