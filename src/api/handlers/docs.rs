// API documentation: a hand-maintained OpenAPI document plus a Swagger UI page

use axum::{response::Html, Json};
use serde_json::{json, Value};

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Cooking Assistant API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// Interactive documentation
///
/// GET /docs
pub async fn docs_page() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

/// OpenAPI document
///
/// GET /openapi.json
pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}

fn user_id_param() -> Value {
    json!({
        "name": "user_id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn secured(mut op: Value) -> Value {
    op["security"] = json!([{ "bearerAuth": [] }]);
    op
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Cooking Assistant API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "WhatsApp cooking assistant: Twilio webhook and admin endpoints"
        },
        "components": components(),
        "paths": {
            "/health": {
                "get": { "summary": "Liveness check", "responses": { "200": { "description": "OK" } } }
            },
            "/whatsapp": { "post": webhook_operation() },
            "/api/auth/login": { "post": login_operation() },
            "/api/users": { "get": list_users_operation() },
            "/api/users/{user_id}": user_operations(),
            "/api/users/{user_id}/preferences": {
                "patch": secured(json!({
                    "summary": "Merge preference changes",
                    "parameters": [user_id_param()],
                    "requestBody": json_body(json!({ "$ref": "#/components/schemas/Preferences" })),
                    "responses": { "200": { "description": "Updated preferences" } }
                }))
            },
            "/api/users/{user_id}/inventory": {
                "get": secured(json!({
                    "summary": "Kitchen inventory",
                    "parameters": [user_id_param()],
                    "responses": { "200": { "description": "Inventory" } }
                }))
            },
            "/api/users/{user_id}/conversation": {
                "delete": secured(json!({
                    "summary": "Clear conversation history",
                    "parameters": [user_id_param()],
                    "responses": { "204": { "description": "Cleared" } }
                }))
            }
        }
    })
}

fn json_body(schema: Value) -> Value {
    json!({ "content": { "application/json": { "schema": schema } } })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn components() -> Value {
    let preferences = json!({
        "type": "object",
        "properties": {
            "chef_personality": {
                "type": "string",
                "enum": ["funny", "direct", "warm", "informative"]
            },
            "dietary_restrictions": string_list(),
            "favorite_cuisines": string_list(),
            "cooking_skill_level": { "type": "string" },
            "spice_preference": { "type": "string" },
            "allergies": string_list()
        }
    });

    json!({
        "securitySchemes": {
            "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
        },
        "schemas": {
            "Preferences": preferences,
            "InventoryItem": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "amount": { "type": "string", "example": "2 kg" }
                }
            },
            "Error": {
                "type": "object",
                "properties": { "error": { "type": "string" } }
            }
        }
    })
}

fn webhook_operation() -> Value {
    json!({
        "summary": "Twilio inbound message webhook",
        "requestBody": {
            "content": { "application/x-www-form-urlencoded": { "schema": { "type": "object" } } }
        },
        "responses": {
            "200": { "description": "Processed: status is success, busy or ignored" },
            "400": { "description": "Malformed payload" },
            "403": { "description": "Invalid X-Twilio-Signature" },
            "500": { "description": "Processing failed" }
        }
    })
}

fn login_operation() -> Value {
    let credentials = json!({
        "type": "object",
        "required": ["username", "password"],
        "properties": {
            "username": { "type": "string" },
            "password": { "type": "string" }
        }
    });

    json!({
        "summary": "Admin login",
        "requestBody": json_body(credentials),
        "responses": {
            "200": { "description": "Bearer token" },
            "401": { "description": "Invalid credentials" },
            "503": { "description": "Admin login not configured" }
        }
    })
}

fn list_users_operation() -> Value {
    let limit = json!({
        "name": "limit",
        "in": "query",
        "schema": { "type": "integer", "minimum": 1, "maximum": 100, "default": 20 }
    });
    let offset = json!({
        "name": "offset",
        "in": "query",
        "schema": { "type": "integer", "minimum": 0, "default": 0 }
    });

    secured(json!({
        "summary": "List users, newest first",
        "parameters": [limit, offset],
        "responses": { "200": { "description": "Users" } }
    }))
}

fn user_operations() -> Value {
    let profile = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "email": { "type": "string" },
            "is_active": { "type": "boolean" }
        }
    });

    json!({
        "get": secured(json!({
            "summary": "Get a user",
            "parameters": [user_id_param()],
            "responses": { "200": { "description": "User" }, "404": { "description": "Not found" } }
        })),
        "patch": secured(json!({
            "summary": "Edit name, email or active flag",
            "parameters": [user_id_param()],
            "requestBody": json_body(profile),
            "responses": { "200": { "description": "Updated user" }, "404": { "description": "Not found" } }
        })),
        "delete": secured(json!({
            "summary": "Delete a user",
            "parameters": [user_id_param()],
            "responses": { "204": { "description": "Deleted" }, "404": { "description": "Not found" } }
        }))
    })
}
