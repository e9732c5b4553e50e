//! Status probe and usage page.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

const USAGE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>docrelay</title>
  <style>
    body { font-family: sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; }
    code { background: #f2f2f2; padding: 0.1rem 0.3rem; border-radius: 3px; }
    pre  { background: #f2f2f2; padding: 0.6rem; border-radius: 3px; overflow-x: auto; }
  </style>
</head>
<body>
  <h1>docrelay</h1>
  <p>Normalises document payloads, extracts text from PDFs, and returns a
  summary from a chat-completion API.</p>

  <h2>Endpoints</h2>
  <ul>
    <li><code>GET /test</code> — status probe</li>
    <li><code>POST /buffer-to-text</code> — body <code>{"buffer": number[] | base64-string}</code>, returns <code>{"text", "summary"}</code></li>
    <li><code>POST /blob-to-text</code> — multipart field <code>file</code> or body <code>{"blob": ...}</code>, returns <code>{"text", "summary"}</code></li>
    <li><code>POST /summarize</code> — body <code>{"text": string, "context"?: string}</code>, returns <code>{"summary"}</code></li>
  </ul>

  <h2>Example</h2>
  <pre>curl -X POST http://localhost:3000/summarize \
  -H 'Content-Type: application/json' \
  -d '{"text": "The quarterly report shows revenue grew 12%..."}'</pre>
</body>
</html>
"#;

/// GET / — static usage page.
pub async fn usage() -> Html<&'static str> {
    Html(USAGE_PAGE)
}

/// GET /test — liveness probe reporting whether a credential is configured.
///
/// The flag reads the config struct, not the process environment, so it
/// reflects exactly what the summariser will use.
pub async fn test(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "docrelay is running",
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "env": {
            "OPENAI_API_KEY_SET": state.config.credential_configured(),
        },
    }))
}
