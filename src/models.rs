use serde::{Deserialize, Serialize};
use sys_locale::get_locale;

/// Eisenhower quadrant. Serialized with the kebab-case names the panel has
/// always stored, so existing settings objects keep deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::UrgentImportant,
        Priority::NotUrgentImportant,
        Priority::UrgentNotImportant,
        Priority::NotUrgentNotImportant,
    ];

    /// TickTick priority scale: 0 none, 1 low, 3 medium, 5 high.
    pub fn ticktick_priority(self) -> u8 {
        match self {
            Priority::UrgentImportant => 5,
            Priority::NotUrgentImportant => 3,
            Priority::UrgentNotImportant => 3,
            Priority::NotUrgentNotImportant => 1,
        }
    }

    pub fn label(self, lang: Lang) -> &'static str {
        match (lang, self) {
            (Lang::Zh, Priority::UrgentImportant) => "重要且紧急",
            (Lang::Zh, Priority::NotUrgentImportant) => "重要不紧急",
            (Lang::Zh, Priority::UrgentNotImportant) => "不重要但紧急",
            (Lang::Zh, Priority::NotUrgentNotImportant) => "不重要不紧急",
            (Lang::En, Priority::UrgentImportant) => "important & urgent",
            (Lang::En, Priority::NotUrgentImportant) => "important, not urgent",
            (Lang::En, Priority::UrgentNotImportant) => "urgent, not important",
            (Lang::En, Priority::NotUrgentNotImportant) => "neither urgent nor important",
        }
    }
}

/// Display language for user-facing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Zh,
    En,
}

impl Lang {
    pub fn detect() -> Self {
        let locale = get_locale().unwrap_or_default().to_lowercase();
        if locale.starts_with("zh") {
            Lang::Zh
        } else {
            Lang::En
        }
    }
}

/// A single schedule entry. Field names are camelCase on the wire because
/// the settings object is shared with the host's JS extension world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time, `HH:MM`.
    pub time: String,
    /// Optional end time; absent means a point-in-time task. When present it
    /// is strictly later than `time`.
    #[serde(default)]
    pub end_time: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// True only after a confirmed remote create; cleared on any edit.
    #[serde(default)]
    pub synced_to_tick_tick: bool,
}

/// The panel's slice of the host settings object:
/// `{ enabled, tasks, ticktickToken }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub ticktick_token: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tasks: Vec::new(),
            ticktick_token: String::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_settings_default_values() {
        let settings = PanelSettings::default();
        assert!(settings.enabled);
        assert!(settings.tasks.is_empty());
        assert_eq!(settings.ticktick_token, "");
    }

    #[test]
    fn panel_settings_serde_applies_defaults_for_missing_fields() {
        // A host that has never stored the panel's settings hands back `{}`.
        let settings: PanelSettings = serde_json::from_str("{}").expect("settings deserialize");
        assert!(settings.enabled);
        assert!(settings.tasks.is_empty());
        assert_eq!(settings.ticktick_token, "");

        let settings: PanelSettings =
            serde_json::from_str(r#"{"enabled":false,"ticktickToken":"tok"}"#)
                .expect("settings deserialize");
        assert!(!settings.enabled);
        assert!(settings.tasks.is_empty());
        assert_eq!(settings.ticktick_token, "tok");
    }

    #[test]
    fn priority_uses_kebab_case_wire_names() {
        let value = serde_json::to_value(Priority::UrgentNotImportant).expect("serialize");
        assert_eq!(value, serde_json::json!("urgent-not-important"));

        let back: Priority = serde_json::from_value(serde_json::json!("not-urgent-not-important"))
            .expect("deserialize");
        assert_eq!(back, Priority::NotUrgentNotImportant);
    }

    #[test]
    fn priority_maps_to_ticktick_scale() {
        assert_eq!(Priority::UrgentImportant.ticktick_priority(), 5);
        assert_eq!(Priority::NotUrgentImportant.ticktick_priority(), 3);
        assert_eq!(Priority::UrgentNotImportant.ticktick_priority(), 3);
        assert_eq!(Priority::NotUrgentNotImportant.ticktick_priority(), 1);
    }

    #[test]
    fn task_optional_fields_default_when_missing() {
        // Tasks written by older panel versions have no endTime and no
        // syncedToTickTick key at all.
        let json = r#"
        {
          "id": "t1",
          "title": "stand-up",
          "date": "2024-06-15",
          "time": "09:00",
          "priority": "urgent-important",
          "completed": false,
          "createdAt": "2024-06-14T08:00:00.000Z"
        }
        "#;

        let task: Task = serde_json::from_str(json).expect("task deserialize");
        assert_eq!(task.end_time, None);
        assert!(!task.synced_to_tick_tick);
    }

    #[test]
    fn task_serializes_with_camel_case_keys() {
        let task = Task {
            id: "t1".to_string(),
            title: "stand-up".to_string(),
            date: "2024-06-15".to_string(),
            time: "09:00".to_string(),
            end_time: Some("09:30".to_string()),
            priority: Priority::NotUrgentImportant,
            completed: false,
            created_at: "2024-06-14T08:00:00.000Z".to_string(),
            synced_to_tick_tick: true,
        };

        let value = serde_json::to_value(&task).expect("serialize");
        assert_eq!(value["endTime"], serde_json::json!("09:30"));
        assert_eq!(
            value["createdAt"],
            serde_json::json!("2024-06-14T08:00:00.000Z")
        );
        assert_eq!(value["syncedToTickTick"], serde_json::json!(true));
        assert_eq!(value["priority"], serde_json::json!("not-urgent-important"));
    }
}
