use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{month_grid, MonthGrid};
use crate::error::PanelError;
use crate::models::{Lang, Task};
use crate::store::TaskStore;
use crate::ticktick::{sync_day, RemoteTaskSender, SyncReport};
use crate::views::{format_date_heading, task_list, EditFormModel, TaskDraft, TaskListModel};

/// Transient view state. Reset to "today" when the panel initializes; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub year: i32,
    /// Displayed month, 1-12.
    pub month: u32,
    /// Selected date, `YYYY-MM-DD`.
    pub selected_date: String,
    /// Id of the task open in the editor, if any.
    pub editing: Option<String>,
    pub syncing: bool,
}

/// Everything the host needs to redraw the panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelViewModel {
    pub calendar: MonthGrid,
    pub date_heading: String,
    pub selected_date: String,
    pub list: TaskListModel,
    pub editing: Option<EditFormModel>,
    pub syncing: bool,
    pub token_set: bool,
}

/// Routes UI events to the store and the sync adapter, and owns the
/// transient view state. At most one task is in edit mode at any time.
pub struct PanelController {
    store: TaskStore,
    state: ViewState,
    lang: Lang,
}

impl PanelController {
    /// Builds the controller pointed at "today" and runs the startup expiry
    /// sweep.
    pub fn new(store: TaskStore, today: NaiveDate, lang: Lang) -> Result<Self, PanelError> {
        let removed = store.sweep_expired(today)?;
        if removed > 0 {
            log::info!("startup sweep removed {removed} expired tasks");
        }
        Ok(Self {
            store,
            state: ViewState {
                year: today.year(),
                month: today.month(),
                selected_date: today.format("%Y-%m-%d").to_string(),
                editing: None,
                syncing: false,
            },
            lang,
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn prev_month(&mut self) {
        if self.state.month == 1 {
            self.state.month = 12;
            self.state.year -= 1;
        } else {
            self.state.month -= 1;
        }
    }

    pub fn next_month(&mut self) {
        if self.state.month == 12 {
            self.state.month = 1;
            self.state.year += 1;
        } else {
            self.state.month += 1;
        }
    }

    pub fn select_date(&mut self, date: &str) {
        self.state.selected_date = date.to_string();
    }

    /// Adding stays available while an editor is open; only the row being
    /// edited is locked.
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<Task, PanelError> {
        let updates = draft.validate()?;
        self.store.add_task(
            &updates.title,
            &updates.date,
            &updates.time,
            updates.end_time.as_deref(),
            updates.priority,
        )
    }

    /// Opens the editor for a task. Rejected while another editor is open;
    /// the rejection leaves the open editor untouched.
    pub fn begin_edit(&mut self, id: &str) -> Result<EditFormModel, PanelError> {
        if self.state.editing.is_some() {
            return Err(PanelError::EditorBusy);
        }
        let task = self
            .store
            .tasks()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(PanelError::TaskNotFound)?;
        self.state.editing = Some(id.to_string());
        Ok(EditFormModel::from_task(&task))
    }

    /// Drops the editor without persisting anything; the prior row rendering
    /// comes back on the next render.
    pub fn cancel_edit(&mut self) {
        self.state.editing = None;
    }

    /// Applies the open editor's draft. On validation failure the editor
    /// stays open so the user can correct the input.
    pub fn submit_edit(&mut self, draft: &TaskDraft) -> Result<(), PanelError> {
        let id = self
            .state
            .editing
            .clone()
            .ok_or(PanelError::TaskNotFound)?;
        let updates = draft.validate()?;
        if !self.store.edit_task(&id, updates)? {
            // The task vanished underneath the editor (e.g. swept); close it.
            self.state.editing = None;
            return Err(PanelError::TaskNotFound);
        }
        self.state.editing = None;
        Ok(())
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<(), PanelError> {
        if self.state.editing.is_some() {
            return Err(PanelError::EditorBusy);
        }
        self.store.toggle_complete(id)?;
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<(), PanelError> {
        if self.state.editing.is_some() {
            return Err(PanelError::EditorBusy);
        }
        self.store.delete_task(id)?;
        Ok(())
    }

    pub fn save_token(&mut self, token: &str) -> Result<(), PanelError> {
        self.store.set_token(token)?;
        Ok(())
    }

    pub fn has_token(&self) -> bool {
        !self.store.token().is_empty()
    }

    /// Manual "clean up past tasks" action; returns the removed count.
    pub fn sweep_expired(&mut self, today: NaiveDate) -> Result<usize, PanelError> {
        Ok(self.store.sweep_expired(today)?)
    }

    pub fn is_syncing(&self) -> bool {
        self.state.syncing
    }

    /// Syncs the selected date's pending tasks. The `syncing` flag mirrors
    /// the host's disabled sync button; a second trigger while one is in
    /// flight is refused. The sync runs to completion, there is no
    /// mid-flight cancellation.
    pub async fn sync_selected_day<S: RemoteTaskSender>(
        &mut self,
        sender: &S,
    ) -> Result<SyncReport, PanelError> {
        if self.state.syncing {
            return Err(PanelError::SyncBusy);
        }
        self.state.syncing = true;
        let date = self.state.selected_date.clone();
        let result = sync_day(&self.store, &date, sender).await;
        self.state.syncing = false;

        match &result {
            Ok(report) if report.failed > 0 => {
                log::warn!(
                    "sync for {date} finished with failures: {}",
                    report.errors.join("; ")
                );
            }
            Ok(report) => log::info!("sync for {date} finished success={}", report.success),
            Err(err) => log::warn!("sync for {date} aborted: {err}"),
        }
        Ok(result?)
    }

    /// Builds the full panel view model. Pure with respect to its inputs:
    /// fixed store contents, view state and `today` produce the same model.
    pub fn render(&self, today: NaiveDate) -> PanelViewModel {
        let tasks = self.store.tasks();
        let day_tasks = self.store.tasks_by_date(&self.state.selected_date);
        let editing = self.state.editing.as_ref().and_then(|id| {
            tasks
                .iter()
                .find(|t| t.id == *id)
                .map(EditFormModel::from_task)
        });
        let date_heading = NaiveDate::parse_from_str(&self.state.selected_date, "%Y-%m-%d")
            .map(|d| format_date_heading(d, self.lang))
            .unwrap_or_else(|_| self.state.selected_date.clone());

        PanelViewModel {
            calendar: month_grid(self.state.year, self.state.month, today, &tasks),
            date_heading,
            selected_date: self.state.selected_date.clone(),
            list: task_list(&day_tasks, self.lang),
            editing,
            syncing: self.state.syncing,
            token_set: !self.store.token().is_empty(),
        }
    }
}
