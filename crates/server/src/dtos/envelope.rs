use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every successful response: `{"ok": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Body of every failed response: `{"ok": false, "error": {...}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Mirrors the HTTP status
    pub code: u16,
    pub msg: String,
}

pub type Reply<T> = Json<Envelope<T>>;

pub fn ok<T>(data: T) -> Reply<T> {
    Json(Envelope {
        ok: true,
        data: Some(data),
    })
}
