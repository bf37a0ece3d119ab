// Main rules module - delegates to semantic sub-modules
// - catalogue.rs: report-type descriptor table (keywords, derived column, projection, segment rules)
// - condition.rs: row predicates and the numeric field accessor
// - engine.rs: RuleEngine, applies a descriptor's rules to a table

pub mod catalogue;
pub mod condition;
pub mod engine;

pub use catalogue::{ReportDescriptor, SegmentRule, DESCRIPTORS};
pub use condition::{numeric_field, project, Condition, DerivedColumn};
pub use engine::*;
