//! Recording in-process remote API.
//!
//! Keeps records per collection in insertion order, logs every call, and can
//! be scripted to fail specific `(operation, id)` pairs. Intended for tests
//! and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use billops_core::{EntityKind, InvoiceId};

use crate::api::{EmailDispatch, ListFilter, RemoteApi, RemoteOperation};
use crate::error::RemoteError;

/// One call observed by [`InMemoryRemoteApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: RemoteOperation,
    pub kind: Option<EntityKind>,
    pub id: Option<String>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub invoice_id: InvoiceId,
    pub template: String,
    pub correlation: String,
    pub simulado: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryRemoteApi {
    records: RwLock<HashMap<EntityKind, Vec<(String, Value)>>>,
    calls: Mutex<Vec<RecordedCall>>,
    failures: RwLock<HashMap<(RemoteOperation, String), RemoteError>>,
    emails: Mutex<Vec<SentEmail>>,
    simulated_mail: AtomicBool,
}

impl InMemoryRemoteApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mail transport reports every dispatch as simulated (no SMTP configured).
    pub fn with_simulated_mail(self, simulated: bool) -> Self {
        self.simulated_mail.store(simulated, Ordering::SeqCst);
        self
    }

    pub fn set_simulated_mail(&self, simulated: bool) {
        self.simulated_mail.store(simulated, Ordering::SeqCst);
    }

    /// Seed a record without logging a call.
    pub fn insert(&self, kind: EntityKind, id: impl Into<String>, value: Value) {
        let id = id.into();
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let collection = records.entry(kind).or_default();
        match collection.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = value,
            None => collection.push((id, value)),
        }
    }

    /// Make every `operation` on `id` fail with `error`.
    ///
    /// For `list`, use the collection name as the id.
    pub fn fail_on(&self, operation: RemoteOperation, id: impl Into<String>, error: RemoteError) {
        self.failures
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((operation, id.into()), error);
    }

    pub fn record(&self, kind: EntityKind, id: &str) -> Option<Value> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .and_then(|c| c.iter().find(|(k, _)| k == id).map(|(_, v)| v.clone()))
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, kind: EntityKind) -> bool {
        self.len(kind) == 0
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn calls_of(&self, operation: RemoteOperation) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn mutating_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.operation.is_mutating())
            .count()
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.emails.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn log(
        &self,
        operation: RemoteOperation,
        kind: Option<EntityKind>,
        id: Option<&str>,
        payload: Option<&Value>,
    ) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                operation,
                kind,
                id: id.map(str::to_string),
                payload: payload.cloned(),
            });
    }

    fn scripted_failure(&self, operation: RemoteOperation, id: &str) -> Result<(), RemoteError> {
        let failures = self.failures.read().unwrap_or_else(|e| e.into_inner());
        match failures.get(&(operation, id.to_string())) {
            Some(err) => {
                tracing::debug!(?operation, id, error = %err, "scripted remote failure");
                Err(err.clone())
            }
            None => Ok(()),
        }
    }
}

fn matches_filter(value: &Value, filter: &ListFilter) -> bool {
    if let Some(status) = &filter.status {
        if value.get("status").and_then(Value::as_str) != Some(status.as_str()) {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = ["numero", "nome", "cliente"].iter().any(|field| {
            value
                .get(*field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        });
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl RemoteApi for InMemoryRemoteApi {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Value, RemoteError> {
        self.log(RemoteOperation::Get, Some(kind), Some(id), None);
        self.scripted_failure(RemoteOperation::Get, id)?;
        self.record(kind, id)
            .ok_or_else(|| RemoteError::not_found(format!("{} {id}", kind.noun())))
    }

    async fn list(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Value>, RemoteError> {
        self.log(RemoteOperation::List, Some(kind), None, None);
        self.scripted_failure(RemoteOperation::List, kind.collection())?;

        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let matching = records
            .get(&kind)
            .map(|c| {
                c.iter()
                    .map(|(_, v)| v)
                    .filter(|v| matches_filter(v, filter))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let page = match (filter.page, filter.limit) {
            (Some(page), Some(limit)) if limit > 0 => matching
                .into_iter()
                .skip(page.saturating_sub(1) as usize * limit as usize)
                .take(limit as usize)
                .collect(),
            _ => matching,
        };
        Ok(page)
    }

    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, RemoteError> {
        self.log(RemoteOperation::Create, Some(kind), None, Some(&payload));

        let mut object = match payload {
            Value::Object(map) => map,
            _ => return Err(RemoteError::with_code("payload must be an object", "bad_request")),
        };

        let id = match object.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = uuid::Uuid::now_v7().to_string();
                object.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };
        self.scripted_failure(RemoteOperation::Create, &id)?;

        if self.record(kind, &id).is_some() {
            return Err(RemoteError::with_code(
                format!("{} {id} already exists", kind.noun()),
                "conflict",
            ));
        }

        let value = Value::Object(object);
        self.insert(kind, id, value.clone());
        Ok(value)
    }

    async fn update(&self, kind: EntityKind, id: &str, payload: Value) -> Result<Value, RemoteError> {
        self.log(RemoteOperation::Update, Some(kind), Some(id), Some(&payload));
        self.scripted_failure(RemoteOperation::Update, id)?;

        let patch = match payload {
            Value::Object(map) => map,
            _ => return Err(RemoteError::with_code("payload must be an object", "bad_request")),
        };

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let slot = records
            .get_mut(&kind)
            .and_then(|c| c.iter_mut().find(|(k, _)| k == id))
            .ok_or_else(|| RemoteError::not_found(format!("{} {id}", kind.noun())))?;

        let mut merged: Map<String, Value> = match slot.1.take() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.extend(patch);
        slot.1 = Value::Object(merged);
        Ok(slot.1.clone())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), RemoteError> {
        self.log(RemoteOperation::Delete, Some(kind), Some(id), None);
        self.scripted_failure(RemoteOperation::Delete, id)?;

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let collection = records.entry(kind).or_default();
        let before = collection.len();
        collection.retain(|(k, _)| k != id);
        if collection.len() == before {
            return Err(RemoteError::not_found(format!("{} {id}", kind.noun())));
        }
        Ok(())
    }

    async fn send_email(
        &self,
        invoice_id: InvoiceId,
        template: &str,
        correlation: &str,
    ) -> Result<EmailDispatch, RemoteError> {
        let id = invoice_id.to_string();
        self.log(
            RemoteOperation::SendEmail,
            Some(EntityKind::Invoice),
            Some(&id),
            Some(&serde_json::json!({ "template": template, "correlation": correlation })),
        );
        self.scripted_failure(RemoteOperation::SendEmail, &id)?;

        let simulado = self.simulated_mail.load(Ordering::SeqCst);
        self.emails
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentEmail {
                invoice_id,
                template: template.to_string(),
                correlation: correlation.to_string(),
                simulado,
            });

        tracing::info!(invoice_id = %invoice_id, template, correlation, simulado, "[IN-MEMORY] email dispatched");
        Ok(EmailDispatch { simulado })
    }

    async fn generate_payment_link(&self, invoice_id: InvoiceId) -> Result<String, RemoteError> {
        let id = invoice_id.to_string();
        self.log(
            RemoteOperation::GeneratePaymentLink,
            Some(EntityKind::Invoice),
            Some(&id),
            None,
        );
        self.scripted_failure(RemoteOperation::GeneratePaymentLink, &id)?;

        let link = format!("https://pagamentos.invalid/faturas/{id}");
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if let Some((_, Value::Object(map))) = records
            .get_mut(&EntityKind::Invoice)
            .and_then(|c| c.iter_mut().find(|(k, _)| *k == id))
        {
            map.insert("linkPagamento".to_string(), Value::String(link.clone()));
        }
        Ok(link)
    }

    async fn download_document(&self, invoice_id: InvoiceId) -> Result<Vec<u8>, RemoteError> {
        let id = invoice_id.to_string();
        self.log(
            RemoteOperation::DownloadDocument,
            Some(EntityKind::Invoice),
            Some(&id),
            None,
        );
        self.scripted_failure(RemoteOperation::DownloadDocument, &id)?;

        if self.record(EntityKind::Invoice, &id).is_none() {
            return Err(RemoteError::not_found(format!("fatura {id}")));
        }
        Ok(format!("%PDF-1.4\n% fatura {id}\n").into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn crud_round_trip_and_call_log() {
        let api = InMemoryRemoteApi::new();
        api.create(EntityKind::Supplier, json!({ "id": "s1", "nome": "Acme", "ativo": true }))
            .await
            .unwrap();

        let updated = api
            .update(EntityKind::Supplier, "s1", json!({ "ativo": false }))
            .await
            .unwrap();
        assert_eq!(updated["nome"], "Acme");
        assert_eq!(updated["ativo"], false);

        api.delete(EntityKind::Supplier, "s1").await.unwrap();
        let err = api.get(EntityKind::Supplier, "s1").await.unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(api.mutating_calls(), 3);
        assert_eq!(api.calls_of(RemoteOperation::Get), 1);
    }

    #[tokio::test]
    async fn scripted_failures_apply_per_operation_and_id() {
        let api = InMemoryRemoteApi::new();
        api.insert(EntityKind::Invoice, "f1", json!({ "id": "f1" }));
        api.fail_on(RemoteOperation::Delete, "f1", RemoteError::with_code("boom", "internal"));

        let err = api.delete(EntityKind::Invoice, "f1").await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("internal"));
        assert!(api.get(EntityKind::Invoice, "f1").await.is_ok());
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let api = InMemoryRemoteApi::new();
        for (i, status) in ["pendente", "paga", "pendente", "pendente"].iter().enumerate() {
            api.insert(
                EntityKind::Invoice,
                format!("f{i}"),
                json!({ "id": format!("f{i}"), "numero": format!("FT-{i}"), "status": status }),
            );
        }

        let pending = api
            .list(EntityKind::Invoice, &ListFilter::all().with_status("pendente"))
            .await
            .unwrap();
        assert_eq!(pending.len(), 3);

        let second_page = api
            .list(EntityKind::Invoice, &ListFilter::all().with_page(2, 2))
            .await
            .unwrap();
        assert_eq!(second_page.len(), 2);
        assert_eq!(second_page[0]["id"], "f2");

        let search = api
            .list(EntityKind::Invoice, &ListFilter::all().with_search("ft-3"))
            .await
            .unwrap();
        assert_eq!(search.len(), 1);
    }

    #[tokio::test]
    async fn email_outcome_comes_from_transport_switch() {
        let api = InMemoryRemoteApi::new().with_simulated_mail(true);
        let id = InvoiceId::from_u128(5);
        let out = api.send_email(id, "lembrete", "lembrete_vencimento:x").await.unwrap();
        assert!(out.simulado);

        api.set_simulated_mail(false);
        let out = api.send_email(id, "lembrete", "lembrete_vencimento:x").await.unwrap();
        assert!(!out.simulado);
        assert_eq!(api.sent_emails().len(), 2);
    }

    #[tokio::test]
    async fn payment_link_is_stored_on_the_invoice() {
        let api = InMemoryRemoteApi::new();
        let id = InvoiceId::from_u128(8);
        api.insert(EntityKind::Invoice, id.to_string(), json!({ "id": id }));

        let link = api.generate_payment_link(id).await.unwrap();
        let stored = api.record(EntityKind::Invoice, &id.to_string()).unwrap();
        assert_eq!(stored["linkPagamento"], link);

        let pdf = api.download_document(id).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
