use colored::Colorize;

use crate::agent::{habits_persona, ChatSession};
use crate::cli::prompt;
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::llm::ChatClient;
use crate::query::AccessMode;
use crate::settings::{db_path, load_settings};
use crate::tools::{CalculatorTool, ExecuteSqlTool, ToolRegistry};

/// Consumption-habit analysis: each task runs a round-robin sub-chat (the
/// assistant and the tool executor alternate, capped at `max_rounds`) and
/// ends with a reflection summary over the transcript.
pub fn run() -> Result<()> {
    let settings = load_settings();
    let db = db_path();

    let conn = get_connection(&db)?;
    init_db(&conn)?;
    drop(conn);

    let client = ChatClient::new(&settings)?;
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ExecuteSqlTool::new(db, AccessMode::ReadWrite)));
    registry.register(Box::new(CalculatorTool));

    let persona = habits_persona();
    let mut session = ChatSession::new(&client, &registry, &persona);
    session.greet();
    println!("{}", "(empty line ends the session)".dimmed());

    while let Some(task) = prompt(&format!("{} ", "You:".green().bold())) {
        if task.is_empty() {
            break;
        }
        let summary = session.run_grouped(&task, settings.max_rounds)?;
        if !summary.is_empty() {
            println!();
            println!("{}", "Summary".bold());
            println!("{}", textwrap::fill(&summary, 100));
        }
    }
    Ok(())
}
