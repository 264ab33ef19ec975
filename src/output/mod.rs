//! Rendering of ranking reports

pub mod formatter;
pub mod report;
