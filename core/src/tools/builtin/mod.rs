//! Built-in tools

pub mod explain;
pub mod nmap;
pub mod notes;
pub mod quiz;
pub mod scenario;
pub mod terminal;
pub mod tool_guide;

pub use explain::ExplainTool;
pub use nmap::NmapScanTool;
pub use notes::{ReadNotesTool, SaveNoteTool};
pub use quiz::{ListQuizDomainsTool, QuizQuestionTool};
pub use scenario::{ListScenariosTool, ScenarioTool};
pub use terminal::TerminalTool;
pub use tool_guide::{ListToolGuidesTool, ToolGuideTool};

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::notes::NoteStore;
use crate::tools::{Tool, ToolRegistry};
use std::sync::Arc;

/// The full tool set, registered in a fixed order
pub fn default_registry(kb: Arc<KnowledgeBase>, notes: Arc<dyn NoteStore>) -> Result<ToolRegistry> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(TerminalTool::new()),
        Arc::new(NmapScanTool::new()),
        Arc::new(SaveNoteTool::new(Arc::clone(&notes))),
        Arc::new(ReadNotesTool::new(notes)),
        Arc::new(QuizQuestionTool::new(Arc::clone(&kb))),
        Arc::new(ListQuizDomainsTool::new(Arc::clone(&kb))),
        Arc::new(ExplainTool::new(Arc::clone(&kb))),
        Arc::new(ToolGuideTool::new(Arc::clone(&kb))),
        Arc::new(ListToolGuidesTool::new(Arc::clone(&kb))),
        Arc::new(ScenarioTool::new(Arc::clone(&kb))),
        Arc::new(ListScenariosTool::new(kb)),
    ];

    tools
        .into_iter()
        .try_fold(ToolRegistry::builder(), |builder, tool| builder.register(tool))
        .map(|builder| builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::MemoryNoteStore;
    use crate::tools::ToolCall;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_registry_has_all_tools() {
        let registry = default_registry(
            Arc::new(KnowledgeBase::embedded().unwrap()),
            Arc::new(MemoryNoteStore::new()),
        )
        .unwrap();

        assert_eq!(
            registry.list_tools(),
            vec![
                "terminal",
                "nmap_scan",
                "save_note",
                "read_notes",
                "get_quiz_question",
                "list_quiz_domains",
                "explain",
                "get_tool_guide",
                "list_tools",
                "get_scenario",
                "list_scenarios",
            ]
        );

        let result = registry
            .dispatch(ToolCall::new("save_note", json!({"content": "x"})))
            .await;
        assert!(result
            .error_message()
            .unwrap()
            .starts_with("save_note failed: "));
    }
}
