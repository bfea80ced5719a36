/// Reconciliation domain - pure matching, selection and merge rules
///
/// Nothing in this module performs I/O; the application layer feeds it
/// repository search results and registry candidates.
pub mod domain;
pub mod policies;
pub mod services;
