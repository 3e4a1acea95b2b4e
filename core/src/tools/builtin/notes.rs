//! Tools over the shared findings store

use crate::error::Result;
use crate::notes::{NewNote, NoteFilter, NoteStore, NOTE_CATEGORIES};
use crate::tools::{Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// How many notes `read_notes` returns at most
pub const READ_NOTES_LIMIT: usize = 20;

pub struct SaveNoteTool {
    store: Arc<dyn NoteStore>,
}

impl SaveNoteTool {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SaveNoteTool {
    fn name(&self) -> &str {
        "save_note"
    }

    fn description(&self) -> &str {
        "Save a finding or note. Categories: credential, vulnerability, finding, artifact, recon."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The finding or note content"
                },
                "category": {
                    "type": "string",
                    "description": format!("Category: {}", NOTE_CATEGORIES.join(", "))
                },
                "target": {
                    "type": "string",
                    "description": "Related target host/IP"
                }
            },
            "required": ["content", "category"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let content: String = call.get_parameter("content")?;
        let category: String = call.get_parameter("category")?;
        let target = call.get_parameter_or("target", String::new());

        let note = self
            .store
            .append(NewNote::new(content, category).with_target(target))
            .await?;

        Ok(ToolResult::success(
            &call.id,
            json!({"saved": true, "id": note.id, "category": note.category}),
        ))
    }
}

pub struct ReadNotesTool {
    store: Arc<dyn NoteStore>,
}

impl ReadNotesTool {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ReadNotesTool {
    fn name(&self) -> &str {
        "read_notes"
    }

    fn description(&self) -> &str {
        "Read saved findings. Optionally filter by category or target."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Filter by category (optional)"
                },
                "target": {
                    "type": "string",
                    "description": "Filter by target (optional)"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let filter = NoteFilter {
            category: call.get_optional_str("category"),
            target: call.get_optional_str("target"),
            limit: None,
        };

        let matching = self.store.query(&filter).await?;
        let count = matching.len();
        let recent = &matching[count.saturating_sub(READ_NOTES_LIMIT)..];

        Ok(ToolResult::success(
            &call.id,
            json!({"count": count, "notes": recent}),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::MemoryNoteStore;

    #[tokio::test]
    async fn test_save_then_read() {
        let store: Arc<dyn NoteStore> = Arc::new(MemoryNoteStore::new());
        let save = SaveNoteTool::new(Arc::clone(&store));
        let read = ReadNotesTool::new(store);

        let saved = save
            .execute(ToolCall::new(
                "save_note",
                json!({"content": "port 22 open", "category": "recon", "target": "10.0.0.5"}),
            ))
            .await
            .unwrap();
        assert_eq!(saved.payload, json!({"saved": true, "id": 1, "category": "recon"}));

        for i in 0..22 {
            save.execute(ToolCall::new(
                "save_note",
                json!({"content": format!("n{}", i), "category": "finding"}),
            ))
            .await
            .unwrap();
        }

        let all = read.execute(ToolCall::new("read_notes", json!({}))).await.unwrap();
        assert_eq!(all.payload["count"], json!(23));
        assert_eq!(all.payload["notes"].as_array().unwrap().len(), 20);

        let recon = read
            .execute(ToolCall::new("read_notes", json!({"category": "recon", "target": "10.0"})))
            .await
            .unwrap();
        assert_eq!(recon.payload["count"], json!(1));
        assert_eq!(recon.payload["notes"][0]["content"], json!("port 22 open"));
    }

    #[test]
    fn test_save_schema_lists_categories() {
        let save = SaveNoteTool::new(Arc::new(MemoryNoteStore::new()));
        let schema = save.parameters_schema();
        let described = schema["properties"]["category"]["description"].as_str().unwrap();
        for category in NOTE_CATEGORIES {
            assert!(described.contains(category), "missing {}", category);
            assert!(save.description().contains(category));
        }
    }

    #[tokio::test]
    async fn test_save_requires_category() {
        let save = SaveNoteTool::new(Arc::new(MemoryNoteStore::new()));
        assert!(save
            .execute(ToolCall::new("save_note", json!({"content": "x"})))
            .await
            .is_err());
    }
}
