mod repo_priority;

pub use repo_priority::RepoPriority;
