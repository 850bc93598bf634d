//! Bridge-backed MCP tools, one file per tool.
//!
//! Every tool proxies to the host's HTTP bridge through a shared
//! [`BridgeClient`](crate::client::http::BridgeClient); none of them hold
//! model state of their own.

pub mod common;

mod add_property;
mod create_object;
mod find_usages;
mod get_object;
mod list_objects;
mod move_element;
mod router;

pub use add_property::AddPropertyTool;
pub use create_object::CreateObjectTool;
pub use find_usages::FindUsagesTool;
pub use get_object::GetObjectTool;
pub use list_objects::ListObjectsTool;
pub use move_element::MoveElementTool;
pub use router::build_tool_router;
