use axum::{
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Value};

fn query_param(name: &str, schema: Value, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "schema": schema,
        "description": description,
    })
}

fn pagination_params() -> [Value; 2] {
    [
        query_param(
            "limit",
            json!({ "type": "integer", "minimum": 1, "maximum": 10000, "default": 100 }),
            "Page size",
        ),
        query_param(
            "offset",
            json!({ "type": "integer", "minimum": 0, "default": 0 }),
            "Rows to skip",
        ),
    ]
}

fn envelope(item: Value, description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "data": { "type": "array", "items": item },
                        "pagination": { "$ref": "#/components/schemas/Pagination" }
                    }
                }
            }
        }
    })
}

fn bad_request() -> Value {
    json!({
        "description": "Invalid query parameter",
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" }
            }
        }
    })
}

/// OpenAPI 3 document describing the read endpoints.
pub fn openapi_document() -> Value {
    let nullable_number = json!({ "type": "number", "nullable": true });
    let date = json!({ "type": "string", "format": "date" });

    let mut weather_params = vec![
        query_param("station_id", json!({ "type": "string" }), "Station code"),
        query_param("date", date.clone(), "Exact date YYYY-MM-DD"),
        query_param("start_date", date.clone(), "Inclusive lower bound YYYY-MM-DD"),
        query_param("end_date", date.clone(), "Inclusive upper bound YYYY-MM-DD"),
    ];
    weather_params.extend(pagination_params());

    let mut stats_params = vec![
        query_param("station_id", json!({ "type": "string" }), "Station code"),
        query_param("year", json!({ "type": "integer" }), "Exact year"),
        query_param("start_year", json!({ "type": "integer" }), "Inclusive lower bound"),
        query_param("end_year", json!({ "type": "integer" }), "Inclusive upper bound"),
    ];
    stats_params.extend(pagination_params());

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Weather API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Weather observations and yearly station statistics"
        },
        "paths": {
            "/api/weather": {
                "get": {
                    "summary": "List weather observations",
                    "parameters": weather_params,
                    "responses": {
                        "200": envelope(json!({
                            "type": "object",
                            "properties": {
                                "id": { "type": "integer" },
                                "station_id": { "type": "string" },
                                "date": date,
                                "max_temperature_celsius": nullable_number.clone(),
                                "min_temperature_celsius": nullable_number.clone(),
                                "precipitation_mm": nullable_number.clone()
                            }
                        }), "A page of weather observations"),
                        "400": bad_request()
                    }
                }
            },
            "/api/weather/stats": {
                "get": {
                    "summary": "List yearly per-station statistics",
                    "parameters": stats_params,
                    "responses": {
                        "200": envelope(json!({
                            "type": "object",
                            "properties": {
                                "station_id": { "type": "string" },
                                "year": { "type": "integer" },
                                "avg_max_celsius": nullable_number.clone(),
                                "avg_min_celsius": nullable_number.clone(),
                                "total_precip_cm": nullable_number
                            }
                        }), "A page of yearly station statistics"),
                        "400": bad_request()
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Pagination": {
                    "type": "object",
                    "properties": {
                        "total_count": { "type": "integer" },
                        "limit": { "type": "integer" },
                        "offset": { "type": "integer" },
                        "returned": { "type": "integer" }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}

/// GET /openapi.json
pub async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_document())
}

const DOCS_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <title>Weather API</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
      window.ui = SwaggerUIBundle({ url: '/openapi.json', dom_id: '#swagger-ui' });
    </script>
  </body>
</html>"#;

/// GET /docs
pub async fn docs_handler() -> Html<&'static str> {
    Html(DOCS_HTML)
}
