use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{Lang, Priority, Task};
use crate::store::TaskUpdates;

/// A date's tasks prepared for display: ascending by start time, stable for
/// equal times. Zero rows means the host shows its empty-state indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskListModel {
    pub rows: Vec<TaskRow>,
}

impl TaskListModel {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    /// `"09:00"` for a point task, `"09:00 - 10:30"` for an interval task.
    pub time_display: String,
    pub interval: bool,
    pub completed: bool,
    pub synced: bool,
    pub priority: Priority,
    pub priority_label: &'static str,
}

pub fn task_list(tasks: &[Task], lang: Lang) -> TaskListModel {
    let mut tasks: Vec<&Task> = tasks.iter().collect();
    // Vec::sort_by is stable, so equal start times keep their input order.
    tasks.sort_by(|a, b| a.time.cmp(&b.time));

    let rows = tasks
        .into_iter()
        .map(|task| TaskRow {
            id: task.id.clone(),
            title: task.title.clone(),
            time_display: format_task_time(task),
            interval: task.end_time.is_some(),
            completed: task.completed,
            synced: task.synced_to_tick_tick,
            priority: task.priority,
            priority_label: task.priority.label(lang),
        })
        .collect();
    TaskListModel { rows }
}

pub fn format_task_time(task: &Task) -> String {
    match &task.end_time {
        Some(end) => format!("{} - {}", task.time, end),
        None => task.time.clone(),
    }
}

/// An empty end time is a point task and always valid; otherwise the end
/// must be strictly later than the start. Same-day `HH:MM` strings order
/// lexicographically.
pub fn validate_time_range(time: &str, end_time: &str) -> Result<(), ValidationError> {
    if end_time.is_empty() || end_time > time {
        Ok(())
    } else {
        Err(ValidationError::EndNotAfterStart)
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(())
    }
}

/// Raw form input for adding a task or saving an edit. `end_time` is the
/// form field's string value; empty means a point task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub end_time: String,
    pub priority: Priority,
}

impl TaskDraft {
    /// Applies the add/edit validation rules and normalizes the input into
    /// replacement field values.
    pub fn validate(&self) -> Result<TaskUpdates, ValidationError> {
        validate_title(&self.title)?;
        let end_time = self.end_time.trim();
        validate_time_range(&self.time, end_time)?;
        Ok(TaskUpdates {
            title: self.title.trim().to_string(),
            date: self.date.clone(),
            time: self.time.clone(),
            end_time: (!end_time.is_empty()).then(|| end_time.to_string()),
            priority: self.priority,
        })
    }
}

/// Edit form surface, pre-filled from the current record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFormModel {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    /// Empty string when the task has no end time, mirroring the form field.
    pub end_time: String,
    pub priority: Priority,
}

impl EditFormModel {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            date: task.date.clone(),
            time: task.time.clone(),
            end_time: task.end_time.clone().unwrap_or_default(),
            priority: task.priority,
        }
    }
}

/// Long-form heading for the selected date, e.g. `2024年6月15日 星期六` or
/// `Saturday, June 15, 2024`.
pub fn format_date_heading(date: NaiveDate, lang: Lang) -> String {
    match lang {
        Lang::Zh => {
            let weekday = match date.weekday() {
                Weekday::Sun => "日",
                Weekday::Mon => "一",
                Weekday::Tue => "二",
                Weekday::Wed => "三",
                Weekday::Thu => "四",
                Weekday::Fri => "五",
                Weekday::Sat => "六",
            };
            format!(
                "{}年{}月{}日 星期{weekday}",
                date.year(),
                date.month(),
                date.day()
            )
        }
        Lang::En => date.format("%A, %B %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, time: &str, end_time: Option<&str>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task-{id}"),
            date: "2024-06-15".to_string(),
            time: time.to_string(),
            end_time: end_time.map(str::to_string),
            priority: Priority::UrgentNotImportant,
            completed: false,
            created_at: "2024-06-01T00:00:00.000Z".to_string(),
            synced_to_tick_tick: false,
        }
    }

    #[test]
    fn list_sorts_by_start_time_keeping_ties_stable() {
        let tasks = vec![
            task("late", "14:00", None),
            task("tie-first", "09:00", None),
            task("tie-second", "09:00", None),
            task("early", "08:00", None),
        ];
        let model = task_list(&tasks, Lang::En);
        let ids: Vec<&str> = model.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "tie-first", "tie-second", "late"]);
    }

    #[test]
    fn empty_input_yields_the_empty_state() {
        assert!(task_list(&[], Lang::En).is_empty());
    }

    #[test]
    fn rows_carry_display_range_and_labels() {
        let tasks = vec![task("point", "09:00", None), task("span", "10:00", Some("11:30"))];
        let model = task_list(&tasks, Lang::Zh);

        let point = &model.rows[0];
        assert_eq!(point.time_display, "09:00");
        assert!(!point.interval);
        assert_eq!(point.priority_label, "不重要但紧急");

        let span = &model.rows[1];
        assert_eq!(span.time_display, "10:00 - 11:30");
        assert!(span.interval);
    }

    #[test]
    fn time_range_boundaries() {
        // Equal end is invalid: the end must be strictly later.
        assert!(validate_time_range("09:00", "09:00").is_err());
        assert!(validate_time_range("09:00", "08:59").is_err());
        assert!(validate_time_range("09:00", "09:01").is_ok());
        // Empty end means a point task and is always valid.
        assert!(validate_time_range("09:00", "").is_ok());
    }

    #[test]
    fn draft_validation_normalizes_input() {
        let draft = TaskDraft {
            title: "  review PR  ".to_string(),
            date: "2024-06-15".to_string(),
            time: "09:00".to_string(),
            end_time: "  ".to_string(),
            priority: Priority::NotUrgentImportant,
        };
        let updates = draft.validate().expect("valid draft");
        assert_eq!(updates.title, "review PR");
        assert_eq!(updates.end_time, None);

        let bad_title = TaskDraft {
            title: "   ".to_string(),
            ..draft.clone()
        };
        assert_eq!(bad_title.validate().unwrap_err(), ValidationError::EmptyTitle);

        let bad_range = TaskDraft {
            end_time: "08:00".to_string(),
            ..draft
        };
        assert_eq!(
            bad_range.validate().unwrap_err(),
            ValidationError::EndNotAfterStart
        );
    }

    #[test]
    fn edit_form_prefills_from_the_record() {
        let form = EditFormModel::from_task(&task("a", "09:00", Some("10:00")));
        assert_eq!(form.time, "09:00");
        assert_eq!(form.end_time, "10:00");

        let form = EditFormModel::from_task(&task("b", "09:00", None));
        assert_eq!(form.end_time, "");
    }

    #[test]
    fn date_heading_is_localized() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(format_date_heading(date, Lang::Zh), "2024年6月15日 星期六");
        assert_eq!(format_date_heading(date, Lang::En), "Saturday, June 15, 2024");
    }
}
