/// Public library interface for the Productivity Quest MCP server
///
/// The gamified core (tasks, habits, points, badges, achievements,
/// challenges, rewards and the focus timer) is exposed as pure state
/// transitions in [`state`], driven through a [`session::Session`] that
/// mirrors every change to a [`storage::ProductivityStorage`] gateway.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod engine;
pub mod mcp;
pub mod quota;
pub mod session;
pub mod state;
pub mod storage;
pub mod suggest;
pub mod ticker;
pub mod tools;

pub use domain::*;
pub use engine::Notification;
pub use quota::{Feature, Plan, QuotaExceeded};
pub use session::{Clock, FixedClock, Session, SystemClock};
pub use storage::{MemoryStorage, ProductivityStorage, SqliteStorage, StorageError};
pub use suggest::{KeywordGenerator, SuggestionProvider, Suggestions};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A signed-in session plus the suggestion generator, served over MCP
pub struct ProductivityServer {
    session: Session,
    suggestions: Suggestions<KeywordGenerator>,
}

impl ProductivityServer {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            suggestions: Suggestions::new(KeywordGenerator::new()),
        }
    }

    /// Server backed by the SQLite database at `db_path`, signed in as `user`
    ///
    /// The schema is created or migrated on open.
    pub fn open(db_path: PathBuf, user: UserId, plan: Plan) -> Result<Self, ServerError> {
        tracing::info!("Initializing Productivity Quest with database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        let mut session = Session::new(storage, SystemClock, plan);
        session.sign_in(user)?;
        Ok(Self::new(session))
    }

    /// Server backed by the in-memory demo dataset; nothing is written to disk
    pub fn demo(user: UserId, plan: Plan) -> Result<Self, ServerError> {
        tracing::info!("Initializing Productivity Quest with demo data for {}", user);
        let storage = MemoryStorage::demo(&user);
        let mut session = Session::new(storage, SystemClock, plan);
        session.sign_in(user)?;
        Ok(Self::new(session))
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin closes.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "Starting MCP server with {} tasks and {} habits loaded",
            self.session.state().tasks.len(),
            self.session.state().habits.len()
        );
        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await
    }

    /// Run one tool and return its text, with any queued notifications
    /// appended
    ///
    /// A failed call leaves the outbox alone, so its notifications go out
    /// with the next successful one.
    pub async fn call_tool(&mut self, name: &str, args: Value) -> Result<String, ToolError> {
        tracing::debug!("Calling tool {}", name);
        let text = tools::call(&mut self.session, &self.suggestions, name, args).await?;

        let notes = self.session.drain_notifications();
        if notes.is_empty() {
            return Ok(text);
        }
        let notes = notes.iter().map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        Ok(format!("{}\n\n{}", text, notes))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
