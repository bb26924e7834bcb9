//! HTTP transport implementation.
//!
//! Two ways in over plain HTTP:
//!
//! - `POST /invoke` with `{"tool", "parameters"}`, answered with
//!   `{"output"}` or `{"error"}` and a matching status code
//! - JSON-RPC 2.0 over `POST` on the configured RPC path (`/mcp` by default)
//!
//! Both dispatch through the same [`ToolRegistry`](crate::domains::tools::ToolRegistry).

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rmcp::model::{CallToolResult, RawContent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument, warn};

use super::{TransportConfig, TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::INSTRUCTIONS;
use crate::domains::tools::{ToolError, into_protocol_result};

/// Output reported when a tool produced no text.
pub const NO_OUTPUT: &str = "No output.";

/// Protocol revision answered on `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Body of `POST /invoke`.
///
/// Fields are kept loosely typed: a `tool` that is not a string names no
/// registered tool, and `parameters` is checked by the tool itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvokeRequest {
    #[serde(default)]
    pub tool: Option<Value>,
    #[serde(default)]
    pub parameters: Value,
}

impl InvokeRequest {
    /// Parse a raw request body, whatever its content type.
    ///
    /// An empty body or a JSON value that is not an object carries no tool
    /// name; only text that is not JSON at all is an error.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// Requested tool name, if `tool` is a string.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_ref().and_then(Value::as_str)
    }
}

/// Reply of `POST /invoke`: exactly one of `output` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvokeResponse {
    Output(String),
    Error(String),
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let tool_count = server.registry().len();
        let app = router(server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} ({} tools, CORS {})",
            addr, tool_count, cors_status
        );
        info!("  → Invoke:   POST /invoke");
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the axum router for `server`.
pub fn router(server: McpServer, config: &HttpConfig) -> Router {
    let mut app = Router::new()
        .route("/invoke", post(handle_invoke))
        .route(&config.rpc_path, post(handle_rpc))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(server)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Root handler - provides API info.
async fn root_handler(State(server): State<McpServer>) -> impl IntoResponse {
    let rpc_path = match &server.config().transport {
        TransportConfig::Http(http) => http.rpc_path.clone(),
        #[allow(unreachable_patterns)]
        _ => HttpConfig::default().rpc_path,
    };

    Json(serde_json::json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "endpoints": {
            "invoke": "/invoke",
            "rpc": rpc_path,
            "health": "/health"
        },
        "tools": server.registry().tool_names()
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle `POST /invoke`.
#[instrument(skip_all, fields(tool))]
async fn handle_invoke(
    State(server): State<McpServer>,
    body: Bytes,
) -> (StatusCode, Json<InvokeResponse>) {
    let request = match InvokeRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected invoke body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(InvokeResponse::Error(format!("Invalid JSON body: {}", e))),
            );
        }
    };

    let Some(tool) = request.tool_name().map(str::to_string) else {
        warn!("Invoke request without a tool name");
        return (
            StatusCode::NOT_FOUND,
            Json(InvokeResponse::Error("Tool not found".to_string())),
        );
    };
    tracing::Span::current().record("tool", tool.as_str());

    match server.call_tool(&tool, request.parameters).await {
        Ok(result) => (StatusCode::OK, Json(InvokeResponse::Output(first_text(&result)))),
        Err(ToolError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(InvokeResponse::Error("Tool not found".to_string())),
        ),
        Err(e @ ToolError::InvalidArguments(_)) => (
            StatusCode::BAD_REQUEST,
            Json(InvokeResponse::Error(e.to_string())),
        ),
        Err(e) => {
            error!("Error executing tool {}: {}", tool, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InvokeResponse::Error(e.to_string())),
            )
        }
    }
}

/// Text of the first content block, or [`NO_OUTPUT`].
fn first_text(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|block| match &block.raw {
            RawContent::Text(text) if !text.text.is_empty() => Some(text.text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| NO_OUTPUT.to_string())
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(server): State<McpServer>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&server, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,

        // Stateless over HTTP: acknowledge and move on
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": INSTRUCTIONS
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let result = serde_json::json!({
        "tools": server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call request.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing tool name"),
    };

    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let outcome = into_protocol_result(&name, server.call_tool(&name, arguments).await);
    match outcome {
        Ok(result) => match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        Err(e) => JsonRpcResponse::invalid_params(request.id, e.message.to_string()),
    }
}
