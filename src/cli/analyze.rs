use crate::agent::{analysis_persona, ChatSession};
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::llm::ChatClient;
use crate::query::AccessMode;
use crate::settings::{db_path, load_settings};
use crate::tools::{ExecuteSqlTool, ToolRegistry};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db = db_path();

    let conn = get_connection(&db)?;
    init_db(&conn)?;
    drop(conn);

    let client = ChatClient::new(&settings)?;
    let mut registry = ToolRegistry::new();
    // Read-only is enforced here, not just suggested in the prompt.
    registry.register(Box::new(ExecuteSqlTool::new(db, AccessMode::ReadOnly)));

    let persona = analysis_persona();
    ChatSession::new(&client, &registry, &persona).run()
}
