//! Route pattern module
//!
//! Segment classification (`pattern`) and whole-pattern parsing (`parser`).
//! Matching and URL generation live on [`Route`](crate::Route).

pub mod parser;
pub mod pattern;

// Re-export commonly used types
pub use parser::{parse_pattern, ParsedPattern, Segment};
pub use pattern::{classify_segment, PatternSegmentType, SegmentPart};
