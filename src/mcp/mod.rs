/// Model Context Protocol surface
///
/// JSON-RPC framing over stdio, the tool catalog handshake, and the
/// server-pushed timer notifications.

pub mod protocol;
pub mod server;

pub use server::McpServer;
