pub mod source;
pub mod schema;
pub mod executor;

pub use executor::{is_read_only, SqlQueryTool, DEFAULT_MAX_ROWS, NO_RESULTS, SECURITY_VIOLATION};
pub use schema::{create_database, query_tool, QUERY_ARGUMENT, QUERY_TOOL_NAME, SCHEMA};
pub use source::{DataSource, SourceError, SourceResult, SqliteFile};
