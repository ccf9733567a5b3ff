//! Persona configuration and the conversational session loop.
//!
//! Personas are plain data built by the entry point; the session loop
//! forwards the model's tool calls to the registry and feeds results back
//! until the model answers in plain text.

use std::io::Write;

use chrono::Local;
use colored::Colorize;

use crate::db::SCHEMA;
use crate::error::Result;
use crate::llm::{ChatClient, ChatMessage};
use crate::models::Category;
use crate::tools::ToolRegistry;

const TERMINATION_KEYWORDS: [&str; 2] = ["TERMINATE", "FINISH"];

const SUMMARY_PROMPT: &str = "Based on the task and reference answer, summarize and \
give the detailed answer. You must keep detailed data when it occurs.";

pub fn is_termination(text: &str) -> bool {
    TERMINATION_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// Flatten messages into "role: content" lines for the reflection call,
/// skipping system prompts.
fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| format!("{}: {}", m.role, m.content.clone().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip termination keywords so they never reach the user's screen.
fn displayable(text: &str) -> String {
    let mut out = text.to_string();
    for kw in TERMINATION_KEYWORDS {
        out = out.replace(kw, "");
    }
    out.trim().to_string()
}

#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub system_prompt: String,
    pub opening_message: String,
}

pub fn storage_persona() -> Persona {
    let today = Local::now().date_naive();
    Persona {
        name: "Penny".to_string(),
        system_prompt: format!(
            "You are a helpful AI assistant. You help in adding expense/income \
             information into the database. Today's date is {today}. Try to \
             automatically figure out the fields required to store based on the \
             provided context; ask follow-up questions only if you can't work \
             them out yourself. Before termination ask the user if they want to \
             add any other transaction. Say TERMINATE when the task is done."
        ),
        opening_message: "Hey there, I'm here to help you store your transactions. \
                          Let me know what you earned or spent."
            .to_string(),
    }
}

pub fn analysis_persona() -> Persona {
    let today = Local::now().date_naive();
    Persona {
        name: "Penny".to_string(),
        system_prompt: format!(
            "You are a helpful AI assistant. You help in analyzing user \
             transactions and present useful insights back to the user. Today's \
             date is {today}. You should only use SELECT-based queries and not \
             other types. If asked to enter, create, delete or perform other \
             operations, let the user know it's not supported. Before \
             termination ask the user if they want to know any other \
             information. Say FINISH when the task is completed.\n\n\
             Below is the schema for the SQL database:\n{schema}\n\
             List of available categories: {categories}.",
            schema = SCHEMA.trim(),
            categories = Category::labels().join(", "),
        ),
        opening_message: "Hey there, I'm here to help you analyze and provide \
                          insights on your spending. What would you like to know?"
            .to_string(),
    }
}

pub fn habits_persona() -> Persona {
    let today = Local::now().date_naive();
    Persona {
        name: "Penny".to_string(),
        system_prompt: format!(
            "You are a helpful AI assistant. You help in analyzing user \
             transactions and describe the user's consumption habits and \
             preferences. Today's date is {today}. You have a tool to execute \
             SQL queries with no limit on how often you use it, and a tool for \
             calculating the result of a mathematical operation (+, -, *, /). \
             Do not ask any requirement from the user. Say TERMINATE when the \
             task is completed.\n\n\
             Below is the schema for the SQL database:\n{schema}\n\
             List of available categories: {categories}.",
            schema = SCHEMA.trim(),
            categories = Category::labels().join(", "),
        ),
        opening_message: "Hey there, I'm here to analyze your consumption habits \
                          and preferences. What would you like to know?"
            .to_string(),
    }
}

pub struct ChatSession<'a> {
    client: &'a ChatClient,
    registry: &'a ToolRegistry,
    persona: &'a Persona,
    history: Vec<ChatMessage>,
}

impl<'a> ChatSession<'a> {
    pub fn new(client: &'a ChatClient, registry: &'a ToolRegistry, persona: &'a Persona) -> Self {
        let history = vec![ChatMessage::system(persona.system_prompt.clone())];
        Self {
            client,
            registry,
            persona,
            history,
        }
    }

    fn say(&self, text: &str) {
        let shown = displayable(text);
        if shown.is_empty() {
            return;
        }
        println!(
            "{} {}",
            format!("{}:", self.persona.name).cyan().bold(),
            textwrap::fill(&shown, 100)
        );
    }

    fn read_user_input(&self) -> Option<String> {
        print!("{} ", "You:".green().bold());
        std::io::stdout().flush().ok();
        let mut input = String::new();
        match std::io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let trimmed = input.trim().to_string();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            }
        }
    }

    /// Run the model until it produces a plain-text answer, executing any
    /// tool calls it requests along the way. Returns the final text.
    fn complete_turn(&mut self) -> Result<String> {
        loop {
            let reply = self.client.chat(&self.history, &self.registry.specs())?;
            let tool_calls = reply.tool_calls.clone().unwrap_or_default();
            let content = reply.content.clone().unwrap_or_default();
            self.history.push(reply);

            if tool_calls.is_empty() {
                return Ok(content);
            }

            if !content.is_empty() {
                self.say(&content);
            }

            for call in tool_calls {
                println!(
                    "{} {}",
                    "[tool]".yellow(),
                    format!("{}({})", call.function.name, call.function.arguments).dimmed()
                );
                let outcome = call
                    .function
                    .parsed_arguments()
                    .and_then(|args| self.registry.call(&call.function.name, &args));
                let result_text = match outcome {
                    Ok(value) => value.to_string(),
                    Err(e) => {
                        eprintln!("{} {e}", "[tool error]".red());
                        format!("Error: {e}")
                    }
                };
                self.history
                    .push(ChatMessage::tool_result(call.id, result_text));
            }
        }
    }

    /// Print the persona's opening message and record it in the history.
    pub fn greet(&mut self) {
        self.say(&self.persona.opening_message);
        self.history
            .push(ChatMessage::assistant(self.persona.opening_message.clone()));
    }

    /// Interactive session: alternate between stdin and the model until the
    /// model terminates, the user sends an empty line, or stdin closes.
    pub fn run(&mut self) -> Result<()> {
        self.greet();
        println!("{}", "(empty line ends the session)".dimmed());

        while let Some(input) = self.read_user_input() {
            self.history.push(ChatMessage::user(input));
            let answer = self.complete_turn()?;
            self.say(&answer);
            if is_termination(&answer) {
                break;
            }
        }
        Ok(())
    }

    /// Round-robin sub-chat: one task message, then the assistant and the
    /// tool executor alternate without further human input, capped at
    /// `max_rounds`. Afterwards a reflection call summarizes the transcript.
    pub fn run_grouped(&mut self, task: &str, max_rounds: usize) -> Result<String> {
        let task_start = self.history.len();
        self.history.push(ChatMessage::user(task.to_string()));

        for _ in 0..max_rounds {
            let answer = self.complete_turn()?;
            self.say(&answer);
            if is_termination(&answer) {
                break;
            }
            self.history.push(ChatMessage::user(
                "Continue. Say TERMINATE when the task is completed.".to_string(),
            ));
        }

        let summary = self.summarize(task, task_start)?;
        Ok(summary)
    }

    /// Reflection call over this task's exchanges only; earlier tasks in the
    /// same session stay out of the summary.
    fn summarize(&self, task: &str, task_start: usize) -> Result<String> {
        let messages = vec![
            ChatMessage::system(SUMMARY_PROMPT),
            ChatMessage::user(format!(
                "Task: {task}\n\nConversation:\n{}",
                transcript(&self.history[task_start..])
            )),
        ];
        let reply = self.client.chat(&messages, &[])?;
        Ok(displayable(&reply.content.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_detection_is_substring_match() {
        assert!(is_termination("All done. TERMINATE"));
        assert!(is_termination("FINISH"));
        assert!(is_termination("will FINISH now"));
        assert!(!is_termination("terminate"));
        assert!(!is_termination("Anything else?"));
    }

    #[test]
    fn test_displayable_strips_keywords() {
        assert_eq!(displayable("You spent 12.00. TERMINATE"), "You spent 12.00.");
        assert_eq!(displayable("TERMINATE"), "");
    }

    #[test]
    fn test_summary_transcript_covers_only_current_task() {
        let history = vec![
            ChatMessage::system("prompt"),
            ChatMessage::user("what did I spend on fuel?"),
            ChatMessage::assistant("120.00 on fuel. TERMINATE"),
            ChatMessage::user("what about eating out?"),
            ChatMessage::assistant("85.50 on eating out."),
        ];
        let second_task_start = 3;
        let text = transcript(&history[second_task_start..]);
        assert!(text.contains("eating out"));
        assert!(!text.contains("fuel"));
        assert!(!text.contains("prompt"));
    }

    #[test]
    fn test_analysis_prompt_carries_schema_and_categories() {
        let persona = analysis_persona();
        assert!(persona.system_prompt.contains("SELECT-based"));
        assert!(persona.system_prompt.contains("CREATE TABLE IF NOT EXISTS transactions"));
        assert!(persona.system_prompt.contains("Eating Out"));
        assert!(persona.system_prompt.contains("Salary"));
    }

    #[test]
    fn test_storage_prompt_mentions_today() {
        let persona = storage_persona();
        let today = Local::now().date_naive().to_string();
        assert!(persona.system_prompt.contains(&today));
        assert!(persona.system_prompt.contains("TERMINATE"));
    }

    #[test]
    fn test_habits_prompt_names_both_tools() {
        let persona = habits_persona();
        assert!(persona.system_prompt.contains("SQL"));
        assert!(persona.system_prompt.contains("mathematical operation"));
        assert!(persona.system_prompt.contains("Do not ask any requirement"));
    }
}
