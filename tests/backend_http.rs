//! `HttpBackend` against an in-process mock of the document backend.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};

use langrag_web::backend::{BackendError, DocumentBackend, HttpBackend};
use langrag_web::domain::{Message, MessageRole, StagedFile};

/// One multipart part as the mock received it.
#[derive(Debug, Clone, PartialEq)]
struct ReceivedPart {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    len: usize,
}

#[derive(Debug, Clone, Default)]
struct Recorded {
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
    chat_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn record_documents(
    State(recorded): State<Recorded>,
    mut multipart: Multipart,
) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = ReceivedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            len: 0,
        };
        let len = field.bytes().await.unwrap().len();
        recorded.parts.lock().unwrap().push(ReceivedPart { len, ..part });
    }
    Json(json!({ "success": true, "message": "ok" }))
}

async fn answer_chat(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.chat_bodies.lock().unwrap().push(body);
    Json(json!({
        "response": "30 days",
        "sources": [{ "name": "policy.pdf", "page": 2, "content": "Refunds within 30 days." }]
    }))
}

fn happy_backend(recorded: Recorded) -> Router {
    Router::new()
        .route("/api/process-documents", post(record_documents))
        .route("/api/chat", post(answer_chat))
        .with_state(recorded)
}

#[tokio::test]
async fn test_process_documents_sends_indexed_file_parts() {
    let recorded = Recorded::default();
    let url = spawn_mock(happy_backend(recorded.clone())).await;
    let backend = HttpBackend::new(&url).unwrap();

    let files = vec![
        StagedFile::from_bytes("report.pdf", b"%PDF-1.7 body".to_vec()),
        StagedFile::from_bytes("notes.txt", b"hello".to_vec()),
    ];
    let ok = backend.process_documents(&files).await.unwrap();
    assert!(ok);

    let parts = recorded.parts.lock().unwrap().clone();
    assert_eq!(
        parts,
        vec![
            ReceivedPart {
                field: "file_0".into(),
                file_name: Some("report.pdf".into()),
                content_type: Some("application/pdf".into()),
                len: 13,
            },
            ReceivedPart {
                field: "file_1".into(),
                file_name: Some("notes.txt".into()),
                content_type: Some("text/plain".into()),
                len: 5,
            },
        ]
    );
}

#[tokio::test]
async fn test_generate_response_posts_query_and_history() {
    let recorded = Recorded::default();
    let url = spawn_mock(happy_backend(recorded.clone())).await;
    let backend = HttpBackend::new(&url).unwrap();

    let history = vec![
        Message::user("hello"),
        Message::assistant("Hi! Ask me about your documents.", None),
    ];
    let answer = backend
        .generate_response("What is the refund policy?", &history)
        .await
        .unwrap();

    assert_eq!(answer.role(), MessageRole::Assistant);
    assert_eq!(answer.content(), "30 days");
    let sources = answer.sources().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name, "policy.pdf");
    assert_eq!(sources[0].page, Some(2));
    assert_ne!(answer.id(), history[1].id());

    let bodies = recorded.chat_bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({
            "query": "What is the refund policy?",
            "history": [
                { "role": "user", "content": "hello" },
                { "role": "assistant", "content": "Hi! Ask me about your documents." }
            ]
        })]
    );
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "message": "bad request" }))) }),
    );
    let backend = HttpBackend::new(spawn_mock(router).await).unwrap();

    let err = backend.generate_response("hi", &[]).await.unwrap_err();
    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad request");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_field_and_fallback_message() {
    let router = Router::new()
        .route(
            "/api/chat",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "index missing" })),
                )
            }),
        )
        .route(
            "/api/process-documents",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down").into_response() }),
        );
    let backend = HttpBackend::new(spawn_mock(router).await).unwrap();

    let err = backend.generate_response("hi", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("index missing"));

    let files = vec![StagedFile::from_bytes("a.txt", b"x".to_vec())];
    let err = backend.process_documents(&files).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("Failed to process documents"));
}

#[tokio::test]
async fn test_unsuccessful_processing_flag() {
    let router = Router::new().route(
        "/api/process-documents",
        post(|| async { Json(json!({ "success": false })) }),
    );
    let backend = HttpBackend::new(spawn_mock(router).await).unwrap();

    let files = vec![StagedFile::from_bytes("a.txt", b"x".to_vec())];
    assert!(!backend.process_documents(&files).await.unwrap());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(format!("http://{addr}/api")).unwrap();
    let err = backend.generate_response("hi", &[]).await.unwrap_err();
    assert!(matches!(err, BackendError::Http(_)));
    assert_eq!(err.status(), None);
}
