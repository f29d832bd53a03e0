//! API documentation handlers
//!
//! `/openapi.json` is generated from the request and response types;
//! `/docs` and `/redoc` render it with Swagger UI and ReDoc loaded from
//! their public CDNs.

use axum::{response::Html, Json};
use utoipa::OpenApi;

use crate::config::{API_DESCRIPTION, API_TITLE};
use crate::error::ErrorBody;
use crate::models::{CarListing, FraudVerdict, HealthResponse};

pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::root,
        crate::handlers::health::check,
        crate::handlers::check::check,
    ),
    components(schemas(CarListing, FraudVerdict, HealthResponse, ErrorBody)),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Fraud Detection", description = "Odometer fraud checks")
    )
)]
pub struct ApiDoc;

/// The generated document with the service's title and description
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = API_TITLE.to_string();
    doc.info.description = Some(API_DESCRIPTION.to_string());
    doc
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi_document())
}

pub async fn swagger_ui() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title} - Swagger UI</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{spec}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>"##,
        title = API_TITLE,
        spec = OPENAPI_PATH,
    ))
}

pub async fn redoc() -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title} - ReDoc</title>
</head>
<body>
  <redoc spec-url="{spec}"></redoc>
  <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>"#,
        title = API_TITLE,
        spec = OPENAPI_PATH,
    ))
}
