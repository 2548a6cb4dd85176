// Tool surface: JSON-RPC framing, tool schemas and dispatch
pub mod handler;
pub mod protocol;
pub mod stdio;
pub mod tools;
