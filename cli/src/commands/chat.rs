//! Interactive chat REPL

use super::learn::print_learning_tips;
use super::notes::print_recent_notes;
use super::playbook::print_playbooks;
use super::report::write_report;
use super::{connect, open_session, print_execution, progress_printer, run_interruptible};
use crate::config::RawConfig;
use crate::output;
use anyhow::Result;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use pentrex_core::report::NO_FINDINGS;
use pentrex_core::{Agent, AgentCore, LlmClient, Session, StepCallback};
use std::sync::Arc;

const HELP: [(&str, &str); 12] = [
    ("/agent <task>", "Run autonomous agent on task"),
    ("/crew <task>", "Run the crew orchestrator on task"),
    ("/target [host]", "Show or set target"),
    ("/tools", "List available tools"),
    ("/notes", "Show saved findings"),
    ("/report", "Generate pentest report"),
    ("/playbook <name>", "Run attack playbook"),
    ("/playbooks", "List available playbooks"),
    ("/learn", "Learning mode tips"),
    ("/clear", "Clear chat history"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

enum Flow {
    Continue,
    Quit,
}

/// Read one line; `None` on end of input or when no terminal is attached
async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("you ➜")
            .allow_empty(true)
            .interact_text()
    })
    .await?;

    match line {
        Ok(line) => Ok(Some(line)),
        Err(e) => {
            tracing::debug!("input closed: {}", e);
            Ok(None)
        }
    }
}

pub async fn chat_command(config: RawConfig) -> Result<()> {
    let mut session = open_session(&config)?;
    let llm = connect(&config)?;
    let mut assistant = session.assistant(Arc::clone(&llm));

    println!("{}", output::banner());
    if !session.target().is_empty() {
        println!("{}\n", output::success(&format!("Target: {}", session.target())));
    }

    while let Some(line) = read_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let (name, args) = match command.split_once(char::is_whitespace) {
                Some((name, args)) => (name, args.trim()),
                None => (command, ""),
            };
            let flow = handle_command(&name.to_lowercase(), args, &mut session, &mut assistant, &llm).await;
            if let Flow::Quit = flow {
                break;
            }
        } else {
            chat_turn(&session, &mut assistant, line).await;
        }
        println!("{}", output::rule());
    }

    println!("\n  {}\n", "Goodbye!".dimmed());
    Ok(())
}

async fn chat_turn(session: &Session, assistant: &mut AgentCore, message: &str) {
    if let Err(e) = session.refresh_assistant(assistant).await {
        println!("{}", output::error(&format!("Error: {}", e)));
        return;
    }

    let spinner = output::spinner("thinking...");
    let on_step: StepCallback = {
        let spinner = spinner.clone();
        Arc::new(move |line: &str| spinner.println(output::progress_line(line)))
    };
    let result = run_interruptible(assistant, message, &on_step).await;
    spinner.finish_and_clear();

    match result {
        Ok(execution) => {
            println!("\n  {}\n", "pentrex ➜".cyan().bold());
            println!("{}", output::format_reply(&execution.final_result));
        }
        Err(e) => println!("{}", output::error(&format!("Error: {}", e))),
    }
}

/// Run a one-off agent from the chat, printing errors instead of failing
async fn run_task<A: Agent + ?Sized>(agent: &mut A, heading: &str, task: &str) {
    println!("\n{}", output::heading(heading));
    println!("{}\n", output::warn("Press Ctrl+C to stop"));

    match run_interruptible(agent, task, &progress_printer()).await {
        Ok(execution) => print_execution(&execution),
        Err(e) => println!("{}", output::error(&format!("Error: {}", e))),
    }
}

async fn autonomous_task(session: &Session, llm: &Arc<dyn LlmClient>, heading: &str, task: &str) {
    match session.autonomous(Arc::clone(llm), task).await {
        Ok(mut agent) => run_task(&mut agent, heading, task).await,
        Err(e) => println!("{}", output::error(&format!("Error: {}", e))),
    }
}

async fn handle_command(
    name: &str,
    args: &str,
    session: &mut Session,
    assistant: &mut AgentCore,
    llm: &Arc<dyn LlmClient>,
) -> Flow {
    match name {
        "help" | "h" | "?" => {
            println!("{}", output::heading("Commands:"));
            for (usage, description) in HELP {
                println!("    {} {}", format!("{:<20}", usage).green(), description);
            }
        }
        "target" if args.is_empty() => {
            let target = match session.target() {
                "" => "(not set)",
                target => target,
            };
            println!("  Current target: {}", target.yellow());
        }
        "target" => {
            session.set_target(args);
            println!("{}", output::success(&format!("Target set: {}", args)));
        }
        "tools" => {
            let names: Vec<String> = session
                .tools()
                .list_tools()
                .into_iter()
                .map(|name| name.green().to_string())
                .collect();
            println!("  Available tools: {}", names.join(", "));
        }
        "notes" => {
            if let Err(e) = print_recent_notes(session).await {
                println!("{}", output::error(&format!("Error: {}", e)));
            }
        }
        "report" => {
            let dir = session.config().report_dir.clone();
            match write_report(session, &dir).await {
                Ok(Some(path)) => println!("{}", output::success(&format!("Report saved: {}", path.display()))),
                Ok(None) => println!("{}", output::warn(NO_FINDINGS)),
                Err(e) => println!("{}", output::error(&format!("Error: {}", e))),
            }
        }
        "playbooks" => print_playbooks(session),
        "playbook" if args.is_empty() => {
            println!("  Usage: /playbook <name>  (use /playbooks to list)");
        }
        "playbook" if session.target().is_empty() => {
            println!("{}", output::error("Set a target first: /target <host>"));
        }
        "playbook" => match session.playbook_task(args) {
            Ok(task) => autonomous_task(session, llm, &format!("Running playbook: {}", args), &task).await,
            Err(e) => println!("{}", output::error(&e.to_string())),
        },
        "agent" if args.is_empty() => println!("  Usage: /agent <task description>"),
        "agent" => autonomous_task(session, llm, &format!("Agent mode: {}", args), args).await,
        "crew" if args.is_empty() => println!("  Usage: /crew <task description>"),
        "crew" => {
            let mut crew = session.crew(Arc::clone(llm));
            run_task(&mut crew, &format!("Crew mode: {}", args), args).await;
        }
        "learn" => print_learning_tips(),
        "clear" => {
            assistant.reset();
            println!("{}", output::warn("Chat cleared."));
        }
        "quit" | "exit" | "q" => return Flow::Quit,
        other => println!(
            "{}",
            output::warn(&format!("Unknown command: /{}. Type /help for commands.", other))
        ),
    }
    Flow::Continue
}
