use crate::agent::{storage_persona, ChatSession};
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::llm::ChatClient;
use crate::settings::{db_path, load_settings};
use crate::tools::{StoreTransactionTool, ToolRegistry};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db = db_path();

    // Make sure the table exists before the model starts inserting.
    let conn = get_connection(&db)?;
    init_db(&conn)?;
    drop(conn);

    let client = ChatClient::new(&settings)?;
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(StoreTransactionTool::new(db)));

    let persona = storage_persona();
    ChatSession::new(&client, &registry, &persona).run()
}
