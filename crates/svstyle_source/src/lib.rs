//! Source text management, span tracking, and line/column resolution.
//!
//! The [`SourceDb`] owns the text of every file handed to the checker. Tokens,
//! tree nodes, and diagnostics refer back into it through [`FileId`] and
//! [`Span`], and [`ResolvedSpan`] turns a span into `path:line:column` form.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
