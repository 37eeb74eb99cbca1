//! Boundary to the console's outer collaborators: the remote HTTP API, the
//! export renderer and the toast presenter.
//!
//! Only the contracts live here plus recording in-process implementations
//! for tests and demos. Payloads at this boundary are `serde_json::Value`.

pub mod api;
pub mod error;
pub mod in_memory;
pub mod presenter;

pub use api::{EmailDispatch, ListFilter, RemoteApi, RemoteOperation};
pub use error::RemoteError;
pub use in_memory::{InMemoryRemoteApi, RecordedCall, SentEmail};
pub use billops_core::EntityKind;
pub use presenter::{
    ExportColumn, ExportFormat, ExportRenderer, Notice, NoticeKind, NotificationPresenter,
    RecordingNotifier, RecordingRenderer,
};
