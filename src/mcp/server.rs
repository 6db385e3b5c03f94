/// MCP server implementation that handles JSON-RPC communication
///
/// The loop waits on two sources at once: request lines from the input and
/// one-second ticks from the [`FocusTicker`]. Both are applied to the same
/// session from this task, one at a time. After every event the ticker is
/// started or stopped to match whether the timer is running.

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::ticker::FocusTicker;
use crate::tools::{self, ToolError};
use crate::{ProductivityServer, ServerError};

/// Method used to push timer events to the client
const MESSAGE_NOTIFICATION: &str = "notifications/message";

pub struct McpServer {
    app: ProductivityServer,
    initialized: bool,
}

impl McpServer {
    pub fn new(app: ProductivityServer) -> Self {
        Self {
            app,
            initialized: false,
        }
    }

    pub fn app(&self) -> &ProductivityServer {
        &self.app
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `input` until it closes
    ///
    /// Owns the session's single [`FocusTicker`] for the whole run.
    pub async fn serve<R, W>(&mut self, input: R, mut output: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut ticker = FocusTicker::new();

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if let Some(response) = self.process_line(&line).await {
                            write_message(&mut output, &response).await?;
                        }
                    }
                    Ok(None) => {
                        info!("MCP server shutting down (input closed)");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read request: {}", e);
                        break;
                    }
                },
                Some(()) = ticker.recv() => {
                    for notification in self.on_tick() {
                        write_message(&mut output, &notification).await?;
                    }
                }
            }

            ticker.follow(self.app.session().state().timer.is_active);
        }

        ticker.stop();
        Ok(())
    }

    /// Apply one timer tick and turn whatever it raised into notifications
    pub fn on_tick(&mut self) -> Vec<JsonRpcNotification> {
        let session = self.app.session_mut();
        if !session.tick() {
            return Vec::new();
        }
        session
            .drain_notifications()
            .into_iter()
            .map(|n| {
                JsonRpcNotification::new(
                    MESSAGE_NOTIFICATION,
                    json!({ "level": "info", "data": n.to_string(), "event": n }),
                )
            })
            .collect()
    }

    /// Process a single line of JSON-RPC input
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        match request.id.clone() {
            Some(id) => Some(self.handle_request(id, request).await),
            None => {
                self.handle_notification(&request);
                None
            }
        }
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                debug!("Client finished initialization");
            }
            other => debug!("Ignoring notification {}", other),
        }
    }

    async fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tools::definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Productivity Quest MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing parameters".to_string(), None);
        };
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
        };

        let args = Value::Object(call.arguments.into_iter().collect());
        let result = match self.app.call_tool(&call.name, args).await {
            Ok(text) => ToolCallResult::success(text),
            Err(e @ (ToolError::UnknownTool(_) | ToolError::InvalidArguments(_))) => {
                warn!("Rejected call to {}: {}", call.name, e);
                return JsonRpcResponse::error(id, tool_error_code(&e), e.to_string(), None);
            }
            Err(e) => {
                debug!("Tool {} failed: {}", call.name, e);
                ToolCallResult::error(e.to_string())
            }
        };

        respond(id, &result)
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}

async fn write_message<W, T>(out: &mut W, message: &T) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let text = serde_json::to_string(message)?;
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    debug!("Sent: {}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::quota::Plan;
    use crate::session::{FixedClock, Session};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tokio::io::{DuplexStream, Lines};
    use tokio::time::sleep;

    fn server(plan: Plan) -> McpServer {
        let clock = FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 6, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        );
        let mut session = Session::new(MemoryStorage::new(), clock, plan);
        session.sign_in(UserId::from("tester")).unwrap();
        McpServer::new(ProductivityServer::new(session))
    }

    async fn call(server: &mut McpServer, line: &str) -> Value {
        let response = server.process_line(line).await.unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_and_list_tools() {
        let mut server = server(Plan::Free);

        let init = call(&mut server, r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        assert_eq!(init["result"]["protocolVersion"], MCP_VERSION);

        let none = server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(none.is_none());
        assert!(server.initialized);

        let list = call(&mut server, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let tools = list["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 18);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_tool_call_round_trip() {
        let mut server = server(Plan::Free);

        let added = call(
            &mut server,
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"task_add","arguments":{"text":"Write tests","priority":"high"}}}"#,
        )
        .await;
        assert_eq!(added["result"]["isError"], false);

        let toggled = call(
            &mut server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"task_toggle","arguments":{"id":1}}}"#,
        )
        .await;
        let text = toggled["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("+20 points"));
        assert!(text.contains("First Step"));
    }

    #[tokio::test]
    async fn test_errors() {
        let mut server = server(Plan::Free);

        let bad = call(&mut server, "{not json").await;
        assert_eq!(bad["error"]["code"], error_codes::PARSE_ERROR);

        let unknown = call(
            &mut server,
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"nope"}}"#,
        )
        .await;
        assert_eq!(unknown["error"]["code"], error_codes::METHOD_NOT_FOUND);

        let gated = call(
            &mut server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"suggest","arguments":{"kind":"focus_tip"}}}"#,
        )
        .await;
        assert_eq!(gated["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_tick_emits_notifications_on_completion() {
        let mut server = server(Plan::Free);
        assert!(server.on_tick().is_empty());

        server.app.session_mut().start_timer();
        let mut emitted = Vec::new();
        for _ in 0..1500 {
            emitted.extend(server.on_tick());
        }
        assert!(!emitted.is_empty());
        assert!(!server.app().session().state().timer.is_active);
        assert_eq!(server.app().session().state().stats.focus_sessions_completed, 1);
    }

    /// Client end of an in-memory connection to [`McpServer::serve`]
    struct Client {
        input: DuplexStream,
        output: Lines<BufReader<DuplexStream>>,
        next_id: u64,
        notifications: Vec<Value>,
    }

    impl Client {
        /// Client plus the reader and writer to hand to `serve`
        fn connect() -> (Self, BufReader<DuplexStream>, DuplexStream) {
            let (input, server_in) = tokio::io::duplex(64 * 1024);
            let (server_out, output) = tokio::io::duplex(64 * 1024);
            let client = Self {
                input,
                output: BufReader::new(output).lines(),
                next_id: 0,
                notifications: Vec::new(),
            };
            (client, BufReader::new(server_in), server_out)
        }

        /// Call a tool and return its text; notifications seen on the way are kept
        async fn call(&mut self, tool: &str, arguments: Value) -> String {
            self.next_id += 1;
            let request = json!({
                "jsonrpc": "2.0",
                "id": self.next_id,
                "method": "tools/call",
                "params": { "name": tool, "arguments": arguments },
            });
            self.input.write_all(format!("{}\n", request).as_bytes()).await.unwrap();

            loop {
                let line = self.output.next_line().await.unwrap().unwrap();
                let message: Value = serde_json::from_str(&line).unwrap();
                if message["id"] == json!(self.next_id) {
                    return message["result"]["content"][0]["text"].as_str().unwrap().to_string();
                }
                self.notifications.push(message);
            }
        }

        async fn status(&mut self) -> String {
            self.call("focus_status", json!({})).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_start_pause_and_resume() {
        let mut server = server(Plan::Pro);
        let (mut client, input, output) = Client::connect();

        let script = async move {
            let started = client.call("focus_control", json!({ "action": "start" })).await;
            assert!(started.contains("25:00 focus (running)"), "{}", started);
            // Starting again must not add a second tick source
            client.call("focus_control", json!({ "action": "start" })).await;

            sleep(Duration::from_millis(2500)).await;
            let paused = client.call("focus_control", json!({ "action": "pause" })).await;
            assert!(paused.contains("24:58 focus (paused)"), "{}", paused);

            sleep(Duration::from_secs(10)).await;
            let idle = client.status().await;
            assert!(idle.contains("24:58 focus (paused)"), "{}", idle);

            client.call("focus_control", json!({ "action": "toggle" })).await;
            sleep(Duration::from_millis(1500)).await;
            let resumed = client.status().await;
            assert!(resumed.contains("24:57 focus (running)"), "{}", resumed);

            client.call("focus_control", json!({ "action": "reset" })).await;
            sleep(Duration::from_secs(5)).await;
            let reset = client.status().await;
            assert!(reset.contains("25:00 focus (paused)"), "{}", reset);
            assert!(client.notifications.is_empty());
        };

        let (served, ()) = tokio::join!(server.serve(input, output), script);
        served.unwrap();
        assert!(!server.app().session().state().timer.is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_stop_when_phase_completes() {
        let mut server = server(Plan::Pro);
        let (mut client, input, output) = Client::connect();

        let script = async move {
            client.call("settings_update", json!({ "focus_time": 1 })).await;
            let reset = client.call("focus_control", json!({ "action": "reset" })).await;
            assert!(reset.contains("01:00 focus (paused)"), "{}", reset);

            client.call("focus_control", json!({ "action": "start" })).await;
            sleep(Duration::from_millis(60_500)).await;
            let done = client.status().await;
            assert!(done.contains("05:00 short break (paused)"), "{}", done);
            assert!(done.contains("sessions completed: 1"), "{}", done);
            assert!(client
                .notifications
                .iter()
                .any(|n| n["params"]["data"].as_str().is_some_and(|d| d.contains("Focus session complete"))));

            sleep(Duration::from_secs(10)).await;
            let later = client.status().await;
            assert!(later.contains("05:00 short break (paused)"), "{}", later);
        };

        let (served, ()) = tokio::join!(server.serve(input, output), script);
        served.unwrap();
        assert_eq!(server.app().session().state().stats.focus_sessions_completed, 1);
    }
}
