//! Private-secretary panel backend: a personal task/calendar manager with a
//! one-way TickTick sync bridge, embeddable in a chat host's extension panel.
//!
//! The host owns the widgets and the event loop; this crate owns the task
//! collection and its persistence, the pure view models (calendar grid, task
//! list, edit form), the interaction state machine, and the sync adapter.

pub mod calendar;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod ticktick;
pub mod views;

pub use controller::{PanelController, PanelViewModel, ViewState};
pub use error::{PanelError, StorageError, SyncError, ValidationError};
pub use models::{Lang, PanelSettings, Priority, Task};
pub use storage::Storage;
pub use store::{TaskStore, TaskUpdates};
pub use ticktick::{sync_day, RemoteTaskSender, SyncReport, TickTickClient};
pub use views::TaskDraft;
