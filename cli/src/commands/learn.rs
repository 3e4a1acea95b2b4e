//! Offline learning commands; none of these contact the model

use crate::output;
use crate::LearnCommand;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use pentrex_core::knowledge::{option_letter, Concept, Scenario, ToolGuide};
use pentrex_core::tools::builtin::quiz::pick_question;
use pentrex_core::KnowledgeBase;
use serde_json::Value;

pub async fn learn_command(action: LearnCommand) -> Result<()> {
    let kb = KnowledgeBase::embedded()?;

    match action {
        LearnCommand::Quiz { domain } => quiz(&kb, domain).await,
        LearnCommand::Explain { topic: Some(topic) } => {
            match kb.find_concept(&topic) {
                Some((_, concept)) => print_concept(concept),
                None => {
                    println!("{}", output::warn(&format!("No explanation for '{}'.", topic)));
                    print_keys("Available topics:", kb.concepts());
                }
            }
            Ok(())
        }
        LearnCommand::Explain { topic: None } => {
            print_keys("Available topics:", kb.concepts());
            Ok(())
        }
        LearnCommand::Tool { name: Some(name) } => {
            match kb.find_tool_guide(&name) {
                Some((_, guide)) => print_guide(guide),
                None => {
                    println!("{}", output::warn(&format!("Tool not found: {}", name)));
                    print_keys("Available tool guides:", kb.tool_guides());
                }
            }
            Ok(())
        }
        LearnCommand::Tool { name: None } => {
            print_keys("Available tool guides:", kb.tool_guides());
            Ok(())
        }
        LearnCommand::Scenario { name: Some(name) } => {
            match kb.find_scenario(&name) {
                Some((_, scenario)) => print_scenario(scenario),
                None => {
                    println!("{}", output::warn(&format!("Scenario not found: {}", name)));
                    print_keys("Available scenarios:", kb.scenarios());
                }
            }
            Ok(())
        }
        LearnCommand::Scenario { name: None } => {
            print_keys("Available scenarios:", kb.scenarios());
            Ok(())
        }
        LearnCommand::List => {
            println!(
                "{}",
                output::heading(&format!("Quiz domains ({} questions):", kb.total_questions()))
            );
            for (domain, questions) in kb.quiz_domains() {
                println!("{}", output::bullet(&format!("{} ({})", domain, questions.len())));
            }
            println!();
            print_keys("Topics:", kb.concepts());
            println!();
            print_keys("Tool guides:", kb.tool_guides());
            println!();
            print_keys("Scenarios:", kb.scenarios());
            Ok(())
        }
    }
}

/// Tips shown by the chat `/learn` command
pub(crate) fn print_learning_tips() {
    println!("{}", output::heading("Learning Mode:"));
    println!("    Try asking:");
    for tip in [
        "quiz me on web attacks",
        "explain sql injection",
        "quiz reconnaissance 3",
        "explain buffer overflow",
        "what tools are used for network scanning?",
    ] {
        println!("{}", output::command(tip));
    }
    println!("    Or run `pentrex learn list` for the offline tables.");
}

fn print_keys<T>(title: &str, table: &[(String, T)]) {
    println!("{}", output::heading(title));
    for key in KnowledgeBase::keys(table) {
        println!("{}", output::bullet(&key));
    }
}

/// Run a blocking dialoguer prompt off the async runtime
async fn select(prompt: String, items: Vec<String>) -> Result<Option<usize>> {
    tokio::task::spawn_blocking(move || {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_opt()
    })
    .await?
    .context("The quiz needs an interactive terminal")
}

async fn quiz(kb: &KnowledgeBase, domain: Option<String>) -> Result<()> {
    let domain = match domain {
        Some(domain) => domain,
        None => {
            let mut domains = KnowledgeBase::keys(kb.quiz_domains());
            domains.insert(0, "random".to_string());
            match select("Pick a domain".to_string(), domains.clone()).await? {
                Some(index) => domains.swap_remove(index),
                None => return Ok(()),
            }
        }
    };

    let (domain, question) = pick_question(kb, &domain).ok_or_else(|| {
        anyhow!(
            "Unknown domain: {}. Available: {}",
            domain,
            KnowledgeBase::keys(kb.quiz_domains()).join(", ")
        )
    })?;

    println!("{}", output::heading(&format!("[{}]", domain)));
    let options: Vec<String> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}) {}", option_letter(i), option))
        .collect();

    let Some(choice) = select(question.question.clone(), options).await? else {
        return Ok(());
    };

    if choice == question.answer {
        println!("{}", output::success("Correct!"));
    } else {
        println!(
            "{}",
            output::error(&format!(
                "Not quite. The answer is {}) {}",
                question.answer_letter(),
                question.options.get(question.answer).map(String::as_str).unwrap_or("?")
            ))
        );
    }
    println!("    {}", question.explanation);
    Ok(())
}

fn print_concept(concept: &Concept) {
    println!(
        "{} {}",
        output::heading(&concept.title),
        format!("({})", concept.category).dimmed()
    );
    println!("\n    {}", concept.description);
    println!("\n{}", output::heading("How it works"));
    println!("    {}", concept.how_it_works);
    println!("\n{}", output::heading("Example"));
    println!("{}", output::command(&concept.example));
    println!("\n{}", output::heading("Tools"));
    for tool in &concept.tools {
        println!("{}", output::bullet(tool));
    }
    println!("\n{}", output::heading("Defenses"));
    for defense in &concept.defenses {
        println!("{}", output::bullet(defense));
    }
}

fn section_title(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_value(value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                println!("{}", output::bullet(&format!("{}  {}", key.bold(), plain(item))));
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(fields) => {
                        for (key, field) in fields {
                            if key == "cmd" || key == "command" {
                                println!("{}", output::command(&plain(field)));
                            } else {
                                println!("{}", output::bullet(&plain(field)));
                            }
                        }
                    }
                    other => println!("{}", output::bullet(&plain(other))),
                }
            }
        }
        other => println!("    {}", plain(other)),
    }
}

fn print_guide(guide: &ToolGuide) {
    println!(
        "{} {}",
        output::heading(&guide.name),
        format!("({})", guide.category).dimmed()
    );
    println!("\n    {}", guide.description);
    for (key, value) in &guide.sections {
        println!("\n{}", output::heading(&section_title(key)));
        print_value(value);
    }
}

fn print_scenario(scenario: &Scenario) {
    println!(
        "{} {}",
        output::heading(&scenario.title),
        format!("({}, {})", scenario.difficulty, scenario.category).dimmed()
    );
    println!("\n    Target: {}", scenario.setup.target);
    println!("    Objective: {}", scenario.setup.objective);
    println!("    Tools: {}", scenario.setup.tools_needed.join(", "));
    if let Some(requirements) = &scenario.setup.requirements {
        println!("    Requirements: {}", requirements);
    }

    println!("\n{}", output::heading("Steps"));
    for step in &scenario.steps {
        println!("{}", output::numbered(step.step as usize, &step.task));
        if let Some(hint) = &step.hint {
            println!("       {}", format!("hint: {}", hint).dimmed());
        }
        for command in step.command.iter().chain(step.commands.iter().flatten()) {
            println!("  {}", output::command(command));
        }
        if let Some(payload) = &step.payload {
            println!("  {}", output::command(payload));
        }
        println!("       expected: {}", step.expected);
    }

    println!("\n{}", output::heading("Lessons"));
    for lesson in &scenario.lessons {
        println!("{}", output::bullet(lesson));
    }
}
