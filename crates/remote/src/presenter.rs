//! Export renderer and toast presenter contracts.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

/// A column of an export: the JSON key to read and its header label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
}

impl ExportColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Turns rows into a downloadable document.
pub trait ExportRenderer: Send + Sync {
    fn render(
        &self,
        rows: &[Value],
        columns: &[ExportColumn],
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
    Info,
}

/// Toast shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

pub trait NotificationPresenter: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Presenter that keeps every notice.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl NotificationPresenter for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, title = %notice.title, "notice");
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}

/// Renderer that records each call and emits tab-separated text.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    renders: Mutex<Vec<(usize, ExportFormat)>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(row count, format)` per render call.
    pub fn renders(&self) -> Vec<(usize, ExportFormat)> {
        self.renders.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ExportRenderer for RecordingRenderer {
    fn render(
        &self,
        rows: &[Value],
        columns: &[ExportColumn],
        format: ExportFormat,
    ) -> Result<Vec<u8>, RemoteError> {
        if columns.is_empty() {
            return Err(RemoteError::with_code("export needs at least one column", "bad_request"));
        }

        self.renders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((rows.len(), format));

        let mut out = columns
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join("\t");
        for row in rows {
            out.push('\n');
            let cells: Vec<String> = columns
                .iter()
                .map(|c| match row.get(&c.key) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                })
                .collect();
            out.push_str(&cells.join("\t"));
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renderer_writes_header_and_rows() {
        let renderer = RecordingRenderer::new();
        let bytes = renderer
            .render(
                &[json!({ "numero": "FT-1", "valorTotal": 1000 }), json!({ "numero": "FT-2" })],
                &[ExportColumn::new("numero", "Número"), ExportColumn::new("valorTotal", "Valor")],
                ExportFormat::Csv,
            )
            .unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Número\tValor\nFT-1\t1000\nFT-2\t");
        assert_eq!(renderer.renders(), vec![(2, ExportFormat::Csv)]);
    }

    #[test]
    fn notifier_keeps_notices_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::new(NoticeKind::Success, "ok", "feito"));
        notifier.notify(Notice::new(NoticeKind::Error, "falha", "erro"));
        let kinds: Vec<_> = notifier.notices().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Error]);
    }
}
