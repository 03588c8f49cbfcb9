//! Reply construction: canned texts and provider-output formatting.

pub mod canned;
pub mod formatter;

pub use canned::CannedReplies;
pub use formatter::ResponseFormatter;
