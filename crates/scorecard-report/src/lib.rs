//! scorecard-report: HTML and Markdown rendering of score records.

pub mod html;
pub mod markdown;
pub mod summary;
