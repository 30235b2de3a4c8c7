use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{PanelError, StorageError, ValidationError};
use crate::models::{PanelSettings, Priority, Task};
use crate::storage::Storage;
use crate::views::validate_time_range;

/// Replacement values for a task's user-editable fields. Completion state,
/// id and creation timestamp are never touched by an edit.
#[derive(Debug, Clone)]
pub struct TaskUpdates {
    pub title: String,
    pub date: String,
    pub time: String,
    pub end_time: Option<String>,
    pub priority: Priority,
}

/// Shared handle to the panel's persisted state. The store is the only
/// writer to storage; every mutating operation saves the full settings
/// object back through the host's data directory.
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<Mutex<PanelSettings>>,
    storage: Arc<Storage>,
}

impl TaskStore {
    /// Loads the persisted settings, falling back to defaults when the file
    /// is missing or unreadable. The panel has no first-run step.
    pub fn load(storage: Storage) -> Self {
        let settings = storage.load_settings().unwrap_or_else(|err| {
            log::warn!("settings unreadable, starting empty: {err}");
            PanelSettings::default()
        });
        Self {
            inner: Arc::new(Mutex::new(settings)),
            storage: Arc::new(storage),
        }
    }

    pub fn snapshot(&self) -> PanelSettings {
        let guard = self.inner.lock().expect("state poisoned");
        guard.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.tasks.clone()
    }

    /// All tasks with a matching `date`, in stored order.
    pub fn tasks_by_date(&self, date: &str) -> Vec<Task> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.tasks.iter().filter(|t| t.date == date).cloned().collect()
    }

    pub fn is_enabled(&self) -> bool {
        let guard = self.inner.lock().expect("state poisoned");
        guard.enabled
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        {
            let mut guard = self.inner.lock().expect("state poisoned");
            guard.enabled = enabled;
        }
        self.persist()
    }

    pub fn token(&self) -> String {
        let guard = self.inner.lock().expect("state poisoned");
        guard.ticktick_token.clone()
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        {
            let mut guard = self.inner.lock().expect("state poisoned");
            guard.ticktick_token = token.trim().to_string();
        }
        self.persist()
    }

    /// Creates, appends and persists a new task. Title and time range are
    /// re-validated here as the last line of defense; the form layer has
    /// normally already rejected bad input.
    pub fn add_task(
        &self,
        title: &str,
        date: &str,
        time: &str,
        end_time: Option<&str>,
        priority: Priority,
    ) -> Result<Task, PanelError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let end_time = end_time.map(str::trim).filter(|s| !s.is_empty());
        validate_time_range(time, end_time.unwrap_or(""))?;

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            end_time: end_time.map(str::to_string),
            priority,
            completed: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            synced_to_tick_tick: false,
        };
        {
            let mut guard = self.inner.lock().expect("state poisoned");
            guard.tasks.push(task.clone());
        }
        self.persist()?;
        log::debug!("added task {} on {}", task.id, task.date);
        Ok(task)
    }

    /// Removing an unknown id is a no-op, not an error.
    pub fn delete_task(&self, id: &str) -> Result<(), StorageError> {
        {
            let mut guard = self.inner.lock().expect("state poisoned");
            guard.tasks.retain(|t| t.id != id);
        }
        self.persist()
    }

    /// Flips `completed`; persists only when the id matched.
    pub fn toggle_complete(&self, id: &str) -> Result<(), StorageError> {
        let found = {
            let mut guard = self.inner.lock().expect("state poisoned");
            match guard.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    task.completed = !task.completed;
                    true
                }
                None => false,
            }
        };
        if found {
            self.persist()?;
        }
        Ok(())
    }

    /// Merges `updates` into the record and clears the synced flag (the
    /// remote copy is stale after any edit). Returns false when the id is
    /// unknown; nothing is persisted in that case.
    pub fn edit_task(&self, id: &str, updates: TaskUpdates) -> Result<bool, StorageError> {
        let found = {
            let mut guard = self.inner.lock().expect("state poisoned");
            match guard.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    task.title = updates.title;
                    task.date = updates.date;
                    task.time = updates.time;
                    task.end_time = updates.end_time;
                    task.priority = updates.priority;
                    task.synced_to_tick_tick = false;
                    true
                }
                None => false,
            }
        };
        if !found {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Flags a task as pushed to TickTick without persisting; the sync loop
    /// saves once after the whole day has been processed.
    pub fn mark_synced(&self, id: &str) {
        let mut guard = self.inner.lock().expect("state poisoned");
        if let Some(task) = guard.tasks.iter_mut().find(|t| t.id == id) {
            task.synced_to_tick_tick = true;
        }
    }

    /// Drops every task dated more than seven calendar days before `today`
    /// and returns the number removed. ISO dates compare lexicographically,
    /// so a task dated exactly seven days ago survives.
    pub fn sweep_expired(&self, today: NaiveDate) -> Result<usize, StorageError> {
        let cutoff = (today - Duration::days(7)).format("%Y-%m-%d").to_string();
        let removed = {
            let mut guard = self.inner.lock().expect("state poisoned");
            let before = guard.tasks.len();
            guard.tasks.retain(|t| t.date.as_str() >= cutoff.as_str());
            before - guard.tasks.len()
        };
        if removed > 0 {
            self.persist()?;
            log::info!("swept {removed} expired tasks (cutoff {cutoff})");
        }
        Ok(removed)
    }

    pub fn persist(&self) -> Result<(), StorageError> {
        self.storage.ensure_dirs()?;
        self.storage.save_settings(&self.snapshot())
    }
}
