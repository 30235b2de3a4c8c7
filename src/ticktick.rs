use std::time::Duration;

use chrono::{LocalResult, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::models::{Lang, Task};
use crate::store::TaskStore;

const TICKTICK_TASK_URL: &str = "https://api.ticktick.com/open/v1/task";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Task shape accepted by `POST /open/v1/task`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    pub title: String,
    /// ISO-8601 start timestamp.
    #[serde(default)]
    pub start_date: String,
    /// TickTick scale: 0 none, 1 low, 3 medium, 5 high.
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub is_all_day: bool,
    /// Present only for interval tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Builds the remote shape for a local task. The timezone is explicit so the
/// conversion stays deterministic under test; production callers pass
/// `chrono::Local`.
pub fn remote_task<Tz: TimeZone>(task: &Task, tz: &Tz) -> Result<RemoteTask, SyncError> {
    let due_date = match &task.end_time {
        Some(end) => Some(to_utc_timestamp(&task.date, end, tz)?),
        None => None,
    };
    Ok(RemoteTask {
        title: task.title.clone(),
        start_date: to_utc_timestamp(&task.date, &task.time, tz)?,
        priority: task.priority.ticktick_priority(),
        is_all_day: false,
        due_date,
    })
}

fn to_utc_timestamp<Tz: TimeZone>(date: &str, time: &str, tz: &Tz) -> Result<String, SyncError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| SyncError::InvalidTask(format!("bad date {date:?}: {err}")))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|err| SyncError::InvalidTask(format!("bad time {time:?}: {err}")))?;
    let local = date.and_time(time);
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        // DST fold: take the earlier instant.
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            return Err(SyncError::InvalidTask(format!(
                "nonexistent local time {local}"
            )));
        }
    };
    Ok(resolved
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Creates one task remotely. Behind a trait so the day-sync loop can be
/// exercised without the network.
#[allow(async_fn_in_trait)]
pub trait RemoteTaskSender {
    async fn send_task(&self, task: &Task, token: &str) -> Result<RemoteTask, SyncError>;
}

pub struct TickTickClient {
    http: reqwest::Client,
}

impl TickTickClient {
    pub fn new() -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }
}

impl RemoteTaskSender for TickTickClient {
    async fn send_task(&self, task: &Task, token: &str) -> Result<RemoteTask, SyncError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SyncError::MissingToken);
        }
        let payload = remote_task(task, &chrono::Local)?;

        let resp = self
            .http
            .post(TICKTICK_TASK_URL)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|err| SyncError::BadResponse(err.to_string()))
    }
}

/// Aggregate result of a day's sync pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub success: usize,
    pub failed: usize,
    /// One `"<title>: <message>"` line per failed task.
    pub errors: Vec<String>,
}

impl SyncReport {
    /// True when there was nothing to sync in the first place.
    pub fn is_noop(&self) -> bool {
        self.success == 0 && self.failed == 0
    }

    /// Status line for the host's sync indicator.
    pub fn message(&self, lang: Lang) -> String {
        match (lang, self.failed) {
            _ if self.is_noop() => match lang {
                Lang::Zh => "没有需要同步的任务".to_string(),
                Lang::En => "nothing to sync".to_string(),
            },
            (Lang::Zh, 0) => format!("成功同步 {} 个任务", self.success),
            (Lang::En, 0) => format!("synced {} task(s)", self.success),
            (Lang::Zh, _) => format!("同步完成: {} 成功, {} 失败", self.success, self.failed),
            (Lang::En, _) => format!(
                "sync finished: {} succeeded, {} failed",
                self.success, self.failed
            ),
        }
    }
}

/// Pushes a date's pending tasks (not completed, not yet synced) one at a
/// time, in stored order. Sends stay sequential: ordering is predictable and
/// the remote rate limit never sees a burst. Individual failures do not
/// abort the loop; the store is saved once after the pass.
pub async fn sync_day<S: RemoteTaskSender>(
    store: &TaskStore,
    date: &str,
    sender: &S,
) -> Result<SyncReport, SyncError> {
    let token = store.token();
    if token.trim().is_empty() {
        return Err(SyncError::MissingToken);
    }

    let pending: Vec<Task> = store
        .tasks_by_date(date)
        .into_iter()
        .filter(|t| !t.completed && !t.synced_to_tick_tick)
        .collect();
    if pending.is_empty() {
        return Ok(SyncReport::default());
    }

    let mut report = SyncReport::default();
    for task in &pending {
        match sender.send_task(task, &token).await {
            Ok(_) => {
                store.mark_synced(&task.id);
                report.success += 1;
            }
            Err(err) => {
                log::warn!("sync failed for {:?}: {err}", task.title);
                report.failed += 1;
                report.errors.push(format!("{}: {err}", task.title));
            }
        }
    }
    store.persist()?;
    Ok(report)
}
