//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the Story Time API: story creation and
//! lookup under `/story`, registration and login under `/user`, plus the
//! root and `/health` probes. The same document is served live at
//! `/api-docs/openapi.json`.
//!
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use story_api::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let doc = ApiDoc::openapi();
    let route_count = doc.paths.paths.len();
    std::fs::write(&output, doc.to_pretty_json()?)?;

    println!("Wrote {} story API routes to {}", route_count, output);
    Ok(())
}
