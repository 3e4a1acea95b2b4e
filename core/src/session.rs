//! Wiring shared by every front end: knowledge, notes, tools and prompts

use crate::agent::{AgentConfig, AgentCore, Crew, PromptBuilder};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::llm::LlmClient;
use crate::notes::{JsonFileNoteStore, NoteStore};
use crate::tools::{default_registry, ToolRegistry};
use crate::{playbooks, report};
use std::sync::Arc;

/// One user's working session
///
/// Built once at startup; agents created from it share the same notes store
/// and tool registry.
pub struct Session {
    config: SessionConfig,
    knowledge: Arc<KnowledgeBase>,
    notes: Arc<dyn NoteStore>,
    tools: Arc<ToolRegistry>,
    prompts: Arc<PromptBuilder>,
}

impl Session {
    /// Session backed by the JSON notes file named in `config`
    pub fn new(config: SessionConfig) -> Result<Self> {
        let notes: Arc<dyn NoteStore> = Arc::new(JsonFileNoteStore::new(config.notes_path.clone()));
        Self::with_note_store(config, notes)
    }

    pub fn with_note_store(config: SessionConfig, notes: Arc<dyn NoteStore>) -> Result<Self> {
        let knowledge = Arc::new(KnowledgeBase::embedded()?);
        let tools = Arc::new(default_registry(Arc::clone(&knowledge), Arc::clone(&notes))?);
        tracing::debug!(tools = tools.len(), notes = %config.notes_path.display(), "session ready");

        Ok(Self {
            config,
            knowledge,
            notes,
            tools,
            prompts: Arc::new(PromptBuilder::new()),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn target(&self) -> &str {
        self.config.target_or_empty()
    }

    /// Change the target; an empty string clears it
    pub fn set_target(&mut self, target: impl Into<String>) {
        let target = target.into();
        self.config.target = (!target.is_empty()).then_some(target);
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn notes(&self) -> &Arc<dyn NoteStore> {
        &self.notes
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Interactive assistant with every tool; call [`Session::refresh_assistant`] before each turn
    pub fn assistant(&self, llm_client: Arc<dyn LlmClient>) -> AgentCore {
        let config = AgentConfig::interactive(self.config.max_agent_iterations);
        AgentCore::new(config, llm_client, Arc::clone(&self.tools))
    }

    /// Rebuild the assistant prompt from the current target and notes
    pub async fn refresh_assistant(&self, assistant: &mut AgentCore) -> Result<()> {
        let notes = self.notes.all().await?;
        assistant.set_system_prompt(self.prompts.assist(self.target(), &notes)?);
        Ok(())
    }

    /// Autonomous agent primed for `task`
    pub async fn autonomous(&self, llm_client: Arc<dyn LlmClient>, task: &str) -> Result<AgentCore> {
        let notes = self.notes.all().await?;
        let system_prompt = self.prompts.autonomous(task, self.target(), &notes)?;
        let config = AgentConfig::autonomous(self.config.max_agent_iterations).with_system_prompt(system_prompt);
        Ok(AgentCore::new(config, llm_client, Arc::clone(&self.tools)))
    }

    pub fn crew(&self, llm_client: Arc<dyn LlmClient>) -> Crew {
        Crew::new(
            llm_client,
            Arc::clone(&self.tools),
            Arc::clone(&self.notes),
            self.target(),
        )
        .with_limits(self.config.max_agent_iterations, self.config.worker_max_steps)
    }

    /// Task text for a playbook against the current target
    pub fn playbook_task(&self, name: &str) -> Result<String> {
        playbooks::build_task(&self.knowledge, &self.prompts, name, self.target())
    }

    /// Markdown report over the saved notes, filtered to the current target when set
    pub async fn report(&self) -> Result<String> {
        let notes = self.notes.all().await?;
        let target = Some(self.target()).filter(|t| !t.is_empty());
        Ok(report::generate_report(&notes, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::core::tests::{text, tool_use, ScriptedLlmClient};
    use crate::error::{AgentError, Error};
    use crate::llm::LlmResponse;
    use crate::notes::{MemoryNoteStore, NewNote};
    use serde_json::json;

    fn session(target: Option<&str>) -> Session {
        let config = SessionConfig {
            target: target.map(str::to_string),
            ..Default::default()
        };
        Session::with_note_store(config, Arc::new(MemoryNoteStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_assistant_sees_new_notes_each_turn() {
        let session = session(Some("10.0.0.5"));
        let llm = Arc::new(ScriptedLlmClient::always(LlmResponse::from_content(vec![text("ok")])));
        let mut assistant = session.assistant(llm.clone());

        session.refresh_assistant(&mut assistant).await.unwrap();
        assistant.run("hello", None).await.unwrap();

        session
            .notes()
            .append(NewNote::new("port 22 open", "recon"))
            .await
            .unwrap();
        session.refresh_assistant(&mut assistant).await.unwrap();
        let execution = assistant.run("again", None).await.unwrap();

        assert_eq!(execution.final_result, "ok");
        let requests = llm.requests.lock().unwrap();
        assert!(requests[0].1.contains("Current target: 10.0.0.5"));
        assert!(!requests[0].1.contains("port 22 open"));
        assert!(requests[1].1.contains("- [recon] port 22 open"));
        assert_eq!(requests[1].0, 3);
        assert_eq!(requests[1].2.len(), 11);
    }

    #[tokio::test]
    async fn test_autonomous_saves_note_through_shared_store() {
        let session = session(None);
        let llm = Arc::new(ScriptedLlmClient::new(vec![
            LlmResponse::from_content(vec![tool_use(
                "t1",
                "save_note",
                json!({"content": "admin panel at /admin", "category": "finding"}),
            )]),
            LlmResponse::from_content(vec![text("Saved it.")]),
        ]));

        let mut agent = session.autonomous(llm, "look around").await.unwrap();
        let execution = agent.run("look around", None).await.unwrap();

        assert!(execution.is_completed());
        assert_eq!(execution.final_result, "Saved it.");
        let notes = session.notes().all().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, "finding");
    }

    #[test]
    fn test_playbook_needs_target() {
        let mut session = session(None);
        assert!(matches!(
            session.playbook_task("web_recon"),
            Err(Error::Agent(AgentError::InvalidTask { .. }))
        ));

        session.set_target("example.com");
        assert!(session.playbook_task("web_recon").unwrap().contains("Target: example.com"));

        session.set_target("");
        assert_eq!(session.config().target, None);
    }

    #[tokio::test]
    async fn test_report_uses_target() {
        let session = session(Some("10.0.0.5"));
        assert_eq!(session.report().await.unwrap(), report::NO_FINDINGS);

        session
            .notes()
            .append(NewNote::new("weak ssh password", "credential").with_target("10.0.0.5"))
            .await
            .unwrap();
        let report = session.report().await.unwrap();
        assert!(report.contains("**Target:** 10.0.0.5"));
        assert!(report.contains("## Credential"));
    }
}
