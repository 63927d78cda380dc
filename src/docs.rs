use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::constants::{OPENAPI_JSON_PATH, SERVICE_NAME, SERVICE_VERSION};
use crate::error::Result;

/// Loads the OpenAPI document, falling back to a minimal one if the file
/// cannot be read or parsed
pub fn load_openapi(path: &Path) -> Value {
    match read_openapi(path) {
        Ok(doc) => {
            info!("Loaded API spec from {}", path.display());
            doc
        }
        Err(e) => {
            error!("Failed to load API spec from {}: {}", path.display(), e);
            fallback_openapi()
        }
    }
}

fn read_openapi(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn fallback_openapi() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": SERVICE_NAME,
            "version": SERVICE_VERSION,
            "description": "API documentation could not be loaded"
        },
        "paths": {}
    })
}

/// Swagger UI page pointed at the served OpenAPI document (pinned CDN versions)
pub fn swagger_ui_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{SERVICE_NAME} Docs</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.17.14/swagger-ui.css" />
    <style>.swagger-ui .topbar {{ display: none }}</style>
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.17.14/swagger-ui-bundle.js" crossorigin="anonymous"></script>
    <script>
      window.onload = function () {{
        window.ui = SwaggerUIBundle({{ url: '{OPENAPI_JSON_PATH}', dom_id: '#swagger-ui' }});
      }};
    </script>
  </body>
</html>"#
    )
}
