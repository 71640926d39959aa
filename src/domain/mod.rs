//! Domain objects parsing and tool integrations
//!
//! Provides the core business logic of distance calculation exposed over the MCP protocol

pub mod tools;
