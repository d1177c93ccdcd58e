use notehub::infrastructure::{AppConfig, FileConfig, HttpNoteGateway};
use serde_json::{json, Value};
use wiremock::MockServer;

#[allow(dead_code)]
pub const TOKEN: &str = "test-token";

/// Wiremock server with a gateway pointed at it
#[allow(dead_code)]
pub struct TestService {
    pub server: MockServer,
    pub gateway: HttpNoteGateway,
}

#[allow(dead_code)]
impl TestService {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server.uri());
        Self { server, gateway }
    }
}

#[allow(dead_code)]
pub fn gateway_for(api_url: &str) -> HttpNoteGateway {
    let file = FileConfig {
        api_url: api_url.to_string(),
        request_timeout_secs: 5,
        ..FileConfig::default()
    };
    let config = AppConfig::from_parts(file, Some(TOKEN.to_string()), None)
        .expect("Test config should resolve");
    HttpNoteGateway::new(&config).expect("Test gateway should build")
}

/// A note record the way the service sends it
#[allow(dead_code)]
pub fn note_json(id: &str, title: &str, content: &str, tag: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "tag": tag,
        "createdAt": "2025-03-01T09:00:00.000Z",
        "updatedAt": "2025-03-01T09:00:00.000Z"
    })
}

/// A list body with the notes under `field`
#[allow(dead_code)]
pub fn page_json(field: &str, notes: Vec<Value>, page: u32, total_pages: u32) -> Value {
    let mut body = json!({
        "page": page,
        "perPage": 12,
        "totalItems": notes.len(),
        "totalPages": total_pages
    });
    body[field] = Value::Array(notes);
    body
}
