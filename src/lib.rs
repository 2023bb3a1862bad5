// tasklist - Task list and theme stores persisted to a key-value medium

pub mod config;
pub mod filter;
pub mod models;
pub mod persist;
pub mod storage;
pub mod tasks;
pub mod theme;

// Re-export main types for convenience
pub use config::{Backend, Config};
pub use filter::{StatusFilter, TaskFilter};
pub use models::{Task, TaskId, now_ms};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, SqliteStorage};
pub use tasks::TaskStore;
pub use theme::{SubscriptionId, Theme, ThemeStore};
