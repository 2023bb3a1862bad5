// Task list state with whole-collection persistence

use crate::filter::{StatusFilter, TaskFilter};
use crate::models::{Task, TaskId, now_ms};
use crate::persist;
use crate::storage::KeyValueStore;
use eyre::{Result, eyre};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Storage key holding the serialized task collection
pub const TASKS_KEY: &str = "todos";

/// Owns the ordered task collection and writes it through on every mutation
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    editing: Option<TaskId>,
    storage: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection from `storage`, or start empty
    pub fn open(storage: S) -> Result<Self> {
        let tasks = dedupe_ids(persist::load_or_default(&storage, TASKS_KEY)?);
        info!(count = tasks.len(), "Loaded task collection");

        Ok(Self {
            tasks,
            editing: None,
            storage,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Id of the task currently being edited, if any
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new incomplete task
    ///
    /// Blank text is rejected silently with `Ok(None)`.
    pub fn create(&mut self, text: &str) -> Result<Option<TaskId>> {
        if text.trim().is_empty() {
            debug!("create: blank text, ignoring");
            return Ok(None);
        }

        let id = self.next_id()?;
        let mut next = self.tasks.clone();
        next.push(Task::new(id, text));
        self.commit(next)?;

        debug!(id, "create: task added");
        Ok(Some(id))
    }

    /// Flip `completed` on the task; returns false if no such task
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            debug!(id, "toggle_complete: not found");
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next[pos].completed = !next[pos].completed;
        let completed = next[pos].completed;
        self.commit(next)?;

        debug!(id, completed, "toggle_complete");
        Ok(true)
    }

    /// Mark the task as the one being edited, replacing any previous marker
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            debug!(id, "begin_edit: not found");
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Finish editing `id`, replacing its text
    ///
    /// Only applies while `id` holds the editing marker. Blank text leaves the
    /// task unchanged, the same rule as `create`, and clears the marker. A failed
    /// write keeps the marker so the edit can be retried.
    pub fn commit_edit(&mut self, id: TaskId, new_text: &str) -> Result<bool> {
        if self.editing != Some(id) {
            debug!(id, editing = ?self.editing, "commit_edit: task is not being edited");
            return Ok(false);
        }

        if new_text.trim().is_empty() {
            self.editing = None;
            debug!(id, "commit_edit: blank text, keeping previous text");
            return Ok(false);
        }

        let Some(pos) = self.position(id) else {
            self.editing = None;
            return Ok(false);
        };
        let mut next = self.tasks.clone();
        next[pos].text = new_text.to_string();
        self.commit(next)?;
        self.editing = None;

        debug!(id, "commit_edit: text replaced");
        Ok(true)
    }

    /// Drop the editing marker without changing anything
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Remove the task; returns false if no such task
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            debug!(id, "delete: not found");
            return Ok(false);
        };

        let mut next = self.tasks.clone();
        next.remove(pos);
        self.commit(next)?;
        if self.editing == Some(id) {
            self.editing = None;
        }

        debug!(id, "delete: task removed");
        Ok(true)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks matching `status` whose text contains `search_term`, ignoring case
    ///
    /// Borrowed and lazy; insertion order is preserved.
    pub fn filtered_view(&self, search_term: &str, status: StatusFilter) -> impl Iterator<Item = &Task> {
        let filter = TaskFilter::new(search_term, status);
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    /// Creation-time id, bumped past the largest existing id if the clock hasn't moved
    fn next_id(&self) -> Result<TaskId> {
        let now = now_ms();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if max >= now => max
                .checked_add(1)
                .ok_or_else(|| eyre!("No task id left after {}", max)),
            _ => Ok(now),
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Write `next` through to storage, then make it the current collection
    ///
    /// On a failed write the in-memory collection is left as it was.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        persist::save(&mut self.storage, TASKS_KEY, &next)?;
        self.tasks = next;
        Ok(())
    }
}

/// Keep the first task for each id; later duplicates are dropped with a warning
fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|t| {
            let first = seen.insert(t.id);
            if !first {
                warn!(id = t.id, text = %t.text, "Duplicate task id in storage, dropping");
            }
            first
        })
        .collect()
}
