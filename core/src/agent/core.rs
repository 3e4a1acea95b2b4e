//! AgentCore implementation

use super::base::{Agent, AgentResult};
use super::config::{AgentConfig, LoopMode, BUDGET_EXHAUSTED_MESSAGE};
use super::execution::{AgentExecution, CancellationFlag, LoopStatus, StepCallback};
use crate::error::Result;
use crate::llm::{ContentBlock, LlmClient, LlmMessage};
use crate::tools::utils::truncate_chars;
use crate::tools::{ToolCall, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Characters of tool arguments shown per progress line
const ARGS_PREVIEW_CHARS: usize = 80;

/// The bounded request/dispatch/append loop shared by every agent kind
pub struct AgentCore {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    conversation_history: Vec<LlmMessage>,
    cancel: CancellationFlag,
    owns_cancel: bool,
}

impl AgentCore {
    /// Create an agent over `tools`, restricted to `config.tools` when non-empty
    pub fn new(config: AgentConfig, llm_client: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>) -> Self {
        let tools = if config.tools.is_empty() {
            tools
        } else {
            Arc::new(tools.subset(&config.tools))
        };

        Self {
            config,
            llm_client,
            tools,
            conversation_history: Vec::new(),
            cancel: CancellationFlag::new(),
            owns_cancel: true,
        }
    }

    /// Observe an externally owned stop flag
    ///
    /// A shared flag is never cleared by `run`, so a stop aimed at the owner
    /// also ends this agent.
    pub fn with_cancel(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self.owns_cancel = false;
        self
    }

    /// Get agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Replace the system prompt used from the next model request on
    pub fn set_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.config.system_prompt = system_prompt.into();
    }

    pub fn history(&self) -> &[LlmMessage] {
        &self.conversation_history
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Clear the conversation and any pending stop
    pub fn reset(&mut self) {
        self.conversation_history.clear();
        self.cancel.reset();
    }

    fn emit(&self, on_step: Option<&StepCallback>, line: String) {
        if let Some(callback) = on_step {
            callback(&line);
        }
    }

    fn text_progress(&self, step: usize, text: &str) -> String {
        let preview = truncate_chars(text, self.config.text_preview_chars);
        match &self.config.progress_label {
            Some(label) => format!("[{}] {}...", label, preview),
            None => format!("[step {}] {}...", step, preview),
        }
    }

    fn tool_progress(&self, call: &ToolCall) -> String {
        let args = truncate_chars(&call.parameters.to_string(), ARGS_PREVIEW_CHARS);
        match &self.config.progress_label {
            Some(label) => format!("[{}:tool] {}({})", label, call.name, args),
            None => format!("[tool] {}({})", call.name, args),
        }
    }

    /// Run the loop on one input
    ///
    /// Model errors propagate; tool failures reach the model as error payloads.
    pub async fn run(&mut self, input: &str, on_step: Option<&StepCallback>) -> Result<AgentExecution> {
        let start_time = Instant::now();

        if self.owns_cancel {
            self.cancel.reset();
        }
        if self.config.mode == LoopMode::Autonomous {
            self.conversation_history.clear();
        }
        self.conversation_history
            .push(LlmMessage::user(format!("{}{}", self.config.input_prefix, input)));

        let schemas = self.tools.list_schemas();
        let mut collected: Vec<String> = Vec::new();
        let mut final_text = String::new();
        let mut status = LoopStatus::BudgetExhausted;
        let mut steps = 0;

        tracing::info!(agent = %self.config.name, max_steps = self.config.max_steps, "run started");

        for step in 1..=self.config.max_steps {
            if self.cancel.is_cancelled() {
                collected.push(format!("[{} stopped by user]", self.config.name));
                status = LoopStatus::Stopped;
                break;
            }
            steps = step;

            tracing::debug!(agent = %self.config.name, step, "requesting model response");
            let response = match self
                .llm_client
                .chat_completion(
                    &self.conversation_history,
                    &self.config.system_prompt,
                    &schemas,
                    None,
                )
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(agent = %self.config.name, step, "model request failed: {}", e);
                    return Err(e);
                }
            };

            for block in &response.content {
                if let ContentBlock::Text { text } = block {
                    if !text.trim().is_empty() {
                        collected.push(text.clone());
                        self.emit(on_step, self.text_progress(step, text));
                    }
                }
            }

            let message = LlmMessage::assistant(response.content);
            let calls = message.tool_calls();
            if calls.is_empty() {
                final_text = message.get_text();
                self.conversation_history.push(message);
                status = LoopStatus::Completed;
                break;
            }
            self.conversation_history.push(message);

            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                self.emit(on_step, self.tool_progress(&call));
                let result = self.tools.dispatch(call).await;
                results.push(ContentBlock::ToolResult {
                    tool_use_id: result.tool_call_id.clone(),
                    content: result.content(),
                    is_error: (!result.success).then_some(true),
                });
            }
            self.conversation_history.push(LlmMessage::tool_results(results));
        }

        let final_result = match (self.config.mode, status) {
            (LoopMode::Interactive, LoopStatus::Completed) => final_text,
            (LoopMode::Interactive, LoopStatus::BudgetExhausted) => BUDGET_EXHAUSTED_MESSAGE.to_string(),
            _ if collected.is_empty() => self.config.empty_result.clone(),
            _ => collected.join("\n\n"),
        };

        tracing::info!(agent = %self.config.name, ?status, steps, "run finished");

        Ok(AgentExecution::new(
            status,
            final_result,
            steps,
            start_time.elapsed().as_millis() as u64,
        ))
    }
}

#[async_trait]
impl Agent for AgentCore {
    async fn run(&mut self, input: &str, on_step: Option<&StepCallback>) -> AgentResult<AgentExecution> {
        AgentCore::run(self, input, on_step).await
    }

    fn cancel_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    fn agent_type(&self) -> &str {
        &self.config.name
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{ChatOptions, LlmResponse, MessageRole};
    use crate::tools::registry::tests::EchoTool;
    use crate::tools::ToolSpec;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records what it was sent
    pub(crate) struct ScriptedLlmClient {
        responses: Mutex<VecDeque<LlmResponse>>,
        repeat_last: Option<LlmResponse>,
        pub(crate) requests: Mutex<Vec<(usize, String, Vec<String>)>>,
        /// Full history sent with each request
        pub(crate) transcripts: Mutex<Vec<Vec<LlmMessage>>>,
    }

    impl ScriptedLlmClient {
        pub(crate) fn new(responses: Vec<LlmResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                repeat_last: None,
                requests: Mutex::new(Vec::new()),
                transcripts: Mutex::new(Vec::new()),
            }
        }

        /// Answer every request with the same response
        pub(crate) fn always(response: LlmResponse) -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                repeat_last: Some(response),
                requests: Mutex::new(Vec::new()),
                transcripts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlmClient {
        async fn chat_completion(
            &self,
            messages: &[LlmMessage],
            system: &str,
            tools: &[ToolSpec],
            _options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            self.requests.lock().unwrap().push((
                messages.len(),
                system.to_string(),
                tools.iter().map(|t| t.name.clone()).collect(),
            ));
            self.transcripts.lock().unwrap().push(messages.to_vec());
            let next = self.responses.lock().unwrap().pop_front();
            next.or_else(|| self.repeat_last.clone()).ok_or_else(|| {
                LlmError::Network {
                    message: "script exhausted".to_string(),
                }
                .into()
            })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }

        fn provider_name(&self) -> &str {
            "test"
        }
    }

    pub(crate) fn tool_use(id: &str, name: &str, input: serde_json::Value) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }
    }

    pub(crate) fn text(body: &str) -> ContentBlock {
        ContentBlock::text(body)
    }

    fn echo_registry() -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::builder()
                .register(Arc::new(EchoTool))
                .unwrap()
                .build(),
        )
    }

    fn agent(config: AgentConfig, client: ScriptedLlmClient) -> AgentCore {
        AgentCore::new(config, Arc::new(client), echo_registry())
    }

    #[tokio::test]
    async fn test_echo_then_done() {
        let client = ScriptedLlmClient::new(vec![
            LlmResponse::from_content(vec![tool_use("t1", "echo", json!({"x": "hi"}))]),
            LlmResponse::from_content(vec![text("done")]),
        ]);
        let mut agent = agent(AgentConfig::interactive(10), client);

        let execution = agent.run("test", None).await.unwrap();

        assert_eq!(execution.status, LoopStatus::Completed);
        assert_eq!(execution.final_result, "done");
        assert_eq!(execution.steps_executed, 2);

        let history = agent.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], LlmMessage::user("test"));
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert!(history[1].has_tool_use());
        assert_eq!(history[2].role, MessageRole::User);
        assert_eq!(
            history[2].content,
            vec![ContentBlock::ToolResult {
                tool_use_id: "t1".to_string(),
                content: r#"{"echoed":"hi"}"#.to_string(),
                is_error: None,
            }]
        );
        assert_eq!(history[3].get_text(), "done");
    }

    #[tokio::test]
    async fn test_tool_results_correlate_in_order() {
        let client = ScriptedLlmClient::new(vec![
            LlmResponse::from_content(vec![
                text("checking"),
                tool_use("a", "echo", json!({"x": "1"})),
                tool_use("b", "missing_tool", json!({})),
                tool_use("c", "echo", json!({"x": "3"})),
            ]),
            LlmResponse::from_content(vec![text("ok")]),
        ]);
        let mut agent = agent(AgentConfig::autonomous(5), client);
        agent.run("go", None).await.unwrap();

        let assistant = &agent.history()[1];
        assert!(matches!(&assistant.content[0], ContentBlock::Text { text } if text == "checking"));

        let results = &agent.history()[2].content;
        assert_eq!(results.len(), assistant.tool_calls().len());
        let ids: Vec<_> = results
            .iter()
            .map(|b| match b {
                ContentBlock::ToolResult { tool_use_id, .. } => tool_use_id.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(matches!(
            &results[1],
            ContentBlock::ToolResult { content, is_error: Some(true), .. }
                if content == r#"{"error":"Unknown tool: missing_tool"}"#
        ));
    }

    #[tokio::test]
    async fn test_budget_exhausted_is_distinct() {
        let looping = LlmResponse::from_content(vec![tool_use("t", "echo", json!({"x": "again"}))]);

        let mut chat = agent(AgentConfig::interactive(1), ScriptedLlmClient::always(looping.clone()));
        let execution = chat.run("hi", None).await.unwrap();
        assert!(execution.budget_exhausted());
        assert_eq!(execution.final_result, BUDGET_EXHAUSTED_MESSAGE);
        assert_eq!(execution.steps_executed, 1);

        let mut auto = agent(AgentConfig::autonomous(3), ScriptedLlmClient::always(looping));
        let execution = auto.run("task", None).await.unwrap();
        assert_eq!(execution.status, LoopStatus::BudgetExhausted);
        assert_eq!(execution.final_result, "Task completed.");
        assert_eq!(execution.steps_executed, 3);
    }

    #[tokio::test]
    async fn test_stop_before_run_reports_stopped() {
        let client = ScriptedLlmClient::always(LlmResponse::from_content(vec![text("never")]));
        let flag = CancellationFlag::new();
        let mut agent = agent(AgentConfig::autonomous(5), client).with_cancel(flag.clone());
        flag.cancel();
        flag.cancel();

        let execution = agent.run("task", None).await.unwrap();
        assert!(execution.was_stopped());
        assert_eq!(execution.final_result, "[Agent stopped by user]");
        assert_eq!(execution.steps_executed, 0);
    }

    #[tokio::test]
    async fn test_stop_between_iterations_keeps_partial_text() {
        let client = ScriptedLlmClient::always(LlmResponse::from_content(vec![
            text("working"),
            tool_use("t", "echo", json!({"x": "1"})),
        ]));
        let mut agent = agent(AgentConfig::autonomous(10), client);
        let flag = Agent::cancel_flag(&agent);

        let on_step: StepCallback = Arc::new(move |line: &str| {
            if line.starts_with("[tool]") {
                flag.cancel();
            }
        });
        let execution = agent.run("task", Some(&on_step)).await.unwrap();

        assert!(execution.was_stopped());
        assert_eq!(execution.steps_executed, 1);
        assert_eq!(execution.final_result, "working\n\n[Agent stopped by user]");
        // The tool batch in flight still completed.
        assert_eq!(agent.history().len(), 3);
    }

    #[tokio::test]
    async fn test_progress_lines() {
        let client = ScriptedLlmClient::new(vec![
            LlmResponse::from_content(vec![
                text("Scanning the host now"),
                tool_use("t1", "echo", json!({"x": "hi"})),
            ]),
            LlmResponse::from_content(vec![text("   ")]),
        ]);
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let on_step: StepCallback = Arc::new(move |line: &str| sink.lock().unwrap().push(line.to_string()));

        let mut agent = agent(AgentConfig::autonomous(5), client);
        let execution = agent.run("task", Some(&on_step)).await.unwrap();

        assert_eq!(
            *lines.lock().unwrap(),
            vec![
                "[step 1] Scanning the host now...".to_string(),
                r#"[tool] echo({"x":"hi"})"#.to_string(),
            ]
        );
        assert_eq!(execution.final_result, "Scanning the host now");
    }

    #[tokio::test]
    async fn test_interactive_history_persists_and_autonomous_resets() {
        let reply = LlmResponse::from_content(vec![text("hello")]);

        let mut chat = agent(AgentConfig::interactive(5), ScriptedLlmClient::always(reply.clone()));
        chat.run("one", None).await.unwrap();
        chat.run("two", None).await.unwrap();
        assert_eq!(chat.history().len(), 4);
        chat.reset();
        assert!(chat.history().is_empty());

        let mut auto = agent(AgentConfig::autonomous(5), ScriptedLlmClient::always(reply));
        auto.run("one", None).await.unwrap();
        auto.run("two", None).await.unwrap();
        assert_eq!(auto.history().len(), 2);
        assert_eq!(auto.history()[0], LlmMessage::user("Execute this task: two"));
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let mut agent = agent(AgentConfig::autonomous(5), ScriptedLlmClient::new(vec![]));
        assert!(agent.run("task", None).await.is_err());
    }

    #[tokio::test]
    async fn test_tool_subset_and_system_prompt_are_sent() {
        let client = Arc::new(ScriptedLlmClient::always(LlmResponse::from_content(vec![text("ok")])));
        let mut agent = AgentCore::new(
            AgentConfig::autonomous(5).with_tools(vec!["nothing".to_string()]),
            client.clone(),
            echo_registry(),
        );
        agent.set_system_prompt("be brief");
        agent.run("task", None).await.unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0], (1, "be brief".to_string(), Vec::<String>::new()));
    }
}
