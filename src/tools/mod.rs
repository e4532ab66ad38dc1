//! Operation handlers.
//!
//! One handler struct per concern, each following the same template: resolve
//! configuration, open a scoped connection, run the fixed statement shape,
//! render text, release the connection. No state survives between calls.
//!
//! - `query`: the generic `execute_query` passthrough
//! - `schema`: schema/table listings and table definition blocks
//! - `identity`: current user and schema lookup

pub mod identity;
pub mod query;
pub mod schema;

pub use identity::IdentityToolHandler;
pub use query::QueryToolHandler;
pub use schema::SchemaToolHandler;
