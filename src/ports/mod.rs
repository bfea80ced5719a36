/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports are the driven interfaces the reconciliation engine uses to
/// reach the artifact repository, the component registry, the file system and
/// the console.
pub mod outbound;
