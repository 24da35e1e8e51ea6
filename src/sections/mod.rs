//! Password rule sections
//!
//! Each section checks one rule and returns an actionable suggestion when
//! the rule is not met. Sections run regardless of the entropy score.

mod blacklist;
mod length;
mod pattern;
mod variety;

pub use blacklist::blacklist_section;
pub use length::length_section;
pub use pattern::pattern_analysis_section;
pub use variety::{digit_section, lowercase_section, symbol_section, uppercase_section};

/// Result type for section functions.
/// - `Some(suggestion)` - rule not met
/// - `None` - rule met
pub type SectionResult = Option<String>;
