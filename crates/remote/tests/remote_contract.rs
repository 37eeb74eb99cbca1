use std::sync::Arc;

use billops_core::{EntityKind, InvoiceId};
use billops_remote::{InMemoryRemoteApi, ListFilter, RemoteApi, RemoteError, RemoteOperation};
use serde_json::json;

fn client(api: &Arc<InMemoryRemoteApi>) -> Arc<dyn RemoteApi> {
    api.clone()
}

#[tokio::test]
async fn created_records_get_an_id_and_reject_duplicates() {
    let api = Arc::new(InMemoryRemoteApi::new());
    let remote = client(&api);

    let created = remote
        .create(EntityKind::Contract, json!({ "numero": "CT-1", "status": "rascunho" }))
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let err = remote
        .create(EntityKind::Contract, json!({ "id": id, "numero": "CT-1" }))
        .await
        .unwrap_err();
    assert_eq!(err.code.as_deref(), Some("conflict"));
    assert_eq!(api.len(EntityKind::Contract), 1);
}

#[tokio::test]
async fn list_failure_is_scripted_by_collection_name() {
    let api = Arc::new(InMemoryRemoteApi::new());
    api.fail_on(
        RemoteOperation::List,
        EntityKind::Payable.collection(),
        RemoteError::with_code("timeout", "gateway_timeout"),
    );
    let remote = client(&api);

    assert!(remote.list(EntityKind::Payable, &ListFilter::all()).await.is_err());
    assert!(remote.list(EntityKind::Invoice, &ListFilter::all()).await.is_ok());
}

#[tokio::test]
async fn documents_exist_only_for_known_invoices() {
    let api = Arc::new(InMemoryRemoteApi::new());
    let known = InvoiceId::from_u128(1);
    api.insert(EntityKind::Invoice, known.to_string(), json!({ "id": known.to_string() }));
    let remote = client(&api);

    let pdf = remote.download_document(known).await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let err = remote
        .download_document(InvoiceId::from_u128(2))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(api.mutating_calls(), 0);
}
