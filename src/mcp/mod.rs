//! Documentation server access.
//!
//! parse_target -> TargetSpec { LocalCommand | RemoteUrl }
//! ToolProvider: "call tool NAME with ARGS" seam used by the dispatcher.
//! McpProvider: parses the target and connects on first use, then keeps the session.
//! Connector / ServerSession: how a session is opened (ChildProcess over rmcp stdio).
//! Remote transports are recognised but not supported.
//!
use anyhow::{Context, Result, bail};
use rmcp::service::{RoleClient, RunningService};
use serde_json::{Map, Value};
use shell_words::split as shell_split;
use std::fmt;
use std::time::Instant;
use tokio::process::Command;
use tokio::sync::OnceCell;
use url::Url;

use crate::cmd::shared::{ToolOutput, tool_names};
use crate::error::CliError;
use crate::{log_debug, log_error, log_info, log_trace, log_warn};

/// Server launched when neither `--target` nor `APPLE_DOCS_TARGET` is given.
pub const DEFAULT_TARGET: &str = "npx -y @kimsungwhee/apple-docs-mcp";

/// A parsed representation of a user-supplied target string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A local process to be spawned. Contains command + arguments.
    LocalCommand {
        original: String,
        program: String,
        args: Vec<String>,
    },
    /// Remote endpoint specified by URL (http/https or ws/wss).
    RemoteUrl { original: String, url: Url },
}

impl TargetSpec {
    /// Returns the original user-supplied form.
    pub fn original(&self) -> &str {
        match self {
            TargetSpec::LocalCommand { original, .. } => original,
            TargetSpec::RemoteUrl { original, .. } => original,
        }
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::LocalCommand { program, args, .. } => {
                if args.is_empty() {
                    write!(f, "local: {}", program)
                } else {
                    write!(f, "local: {} {}", program, args.join(" "))
                }
            }
            TargetSpec::RemoteUrl { url, .. } => write!(f, "remote: {}", url),
        }
    }
}

/// Parse a `--target` value into a structured `TargetSpec`.
///
/// 1. A URL with scheme http, https, ws or wss is remote.
/// 2. Anything else is a local command line, split with shell-style rules.
///
/// Examples:
/// - "npx -y @kimsungwhee/apple-docs-mcp" -> LocalCommand
/// - "node ./dist/index.js" -> LocalCommand
/// - "https://example.org/mcp" -> RemoteUrl
pub fn parse_target(raw: &str) -> Result<TargetSpec> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("Target string is empty");
    }

    if let Ok(url) = Url::parse(trimmed)
        && matches!(url.scheme(), "http" | "https" | "ws" | "wss")
    {
        return Ok(TargetSpec::RemoteUrl {
            original: raw.to_string(),
            url,
        });
    }

    let parts =
        shell_split(trimmed).context("Failed to parse local command line (shell splitting)")?;
    let Some((program, args)) = parts.split_first() else {
        bail!("No tokens produced when parsing local command target");
    };
    if program.is_empty() {
        bail!("Empty program name in local command target");
    }
    Ok(TargetSpec::LocalCommand {
        original: raw.to_string(),
        program: program.clone(),
        args: args.to_vec(),
    })
}

/* ---- Provider seam ---- */

/// Something that can run a named documentation tool.
///
/// Implementations may connect lazily; a connection failure surfaces as
/// `CliError::Load` from the first call.
pub trait ToolProvider {
    async fn call(&self, tool: &str, arguments: Map<String, Value>)
    -> Result<ToolOutput, CliError>;
}

/* ---- Connection seam ---- */

/// A live connection to a documentation server.
pub trait ServerSession {
    /// Tool names the server listed when the session was opened.
    fn tools(&self) -> &[String];

    /// Run one tool; returns the serialized `CallToolResult`.
    async fn call_tool(&self, tool: &str, arguments: Map<String, Value>) -> Result<Value>;

    async fn close(self);
}

/// Opens a `ServerSession` for a parsed target.
pub trait Connector {
    type Session: ServerSession;

    async fn connect(&self, spec: &TargetSpec) -> Result<Self::Session>;
}

/* ---- Provider ---- */

/// MCP client for the documentation server. Parses the target and connects
/// on the first call only; the session is reused for the rest of the run.
pub struct McpProvider<C: Connector = ChildProcess> {
    target: String,
    connector: C,
    session: OnceCell<C::Session>,
}

impl McpProvider<ChildProcess> {
    pub fn new(target: impl Into<String>, show_server_stderr: bool) -> Self {
        Self::with_connector(target, ChildProcess { show_server_stderr })
    }
}

impl<C: Connector> McpProvider<C> {
    pub fn with_connector(target: impl Into<String>, connector: C) -> Self {
        Self {
            target: target.into(),
            connector,
            session: OnceCell::new(),
        }
    }

    async fn session(&self) -> Result<&C::Session, CliError> {
        self.session
            .get_or_try_init(|| async {
                let spec = parse_target(&self.target).map_err(|source| {
                    CliError::InvalidTarget {
                        target: self.target.clone(),
                        source,
                    }
                })?;
                log_debug!("[mcp] target {spec}");
                self.connector.connect(&spec).await.map_err(CliError::Load)
            })
            .await
    }

    /// Close the session, if one was opened.
    pub async fn shutdown(self) {
        if let Some(session) = self.session.into_inner() {
            session.close().await;
        }
    }
}

impl<C: Connector> ToolProvider for McpProvider<C> {
    async fn call(
        &self,
        tool: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput, CliError> {
        let session = self.session().await?;
        if !session.tools().iter().any(|t| t == tool) {
            return Err(CliError::UnknownTool(tool.to_string()));
        }

        log_trace!(
            "[mcp] call {tool} {}",
            serde_json::to_string(&arguments).unwrap_or_default()
        );
        let started = Instant::now();
        let value = session
            .call_tool(tool, arguments)
            .await
            .map_err(|e| CliError::Invocation(format!("{e:#}")))?;
        log_debug!(
            "[mcp] {tool} returned in {} ms",
            started.elapsed().as_millis()
        );
        Ok(ToolOutput::from_json(&value))
    }
}

/* ---- rmcp child-process connector ---- */

/// Spawns the target as a local process and speaks MCP over its stdio.
pub struct ChildProcess {
    show_server_stderr: bool,
}

pub struct RmcpSession {
    service: RunningService<RoleClient, ()>,
    tools: Vec<String>,
}

impl ServerSession for RmcpSession {
    fn tools(&self) -> &[String] {
        &self.tools
    }

    async fn call_tool(&self, tool: &str, arguments: Map<String, Value>) -> Result<Value> {
        use rmcp::model::CallToolRequestParam;

        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: tool.to_string().into(),
                arguments: if arguments.is_empty() {
                    None
                } else {
                    Some(arguments)
                },
            })
            .await?;
        serde_json::to_value(&result).context("unreadable tool result")
    }

    async fn close(self) {
        if let Err(e) = self.service.cancel().await {
            log_error!("[mcp] server task ended abnormally: {e}");
        }
    }
}

impl Connector for ChildProcess {
    type Session = RmcpSession;

    /// Spawn the server, run the MCP handshake and list its tools.
    async fn connect(&self, spec: &TargetSpec) -> Result<RmcpSession> {
        use rmcp::ServiceExt;
        use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};

        let (program, args) = match spec {
            TargetSpec::LocalCommand { program, args, .. } => (program, args),
            TargetSpec::RemoteUrl { url, .. } => {
                bail!("remote targets are not supported ({url}); use a local launch command")
            }
        };

        let started = Instant::now();
        let service = ()
            .serve(TokioChildProcess::new(Command::new(program).configure(
                |c| {
                    for a in args {
                        c.arg(a);
                    }
                    // stdout carries the protocol; stderr is only banner / log noise.
                    if !self.show_server_stderr {
                        c.stderr(std::process::Stdio::null());
                    }
                },
            ))?)
            .await
            .with_context(|| {
                format!(
                    "Failed to spawn & initialize MCP server: '{}'",
                    spec.original()
                )
            })?;

        let listing = service
            .list_tools(Default::default())
            .await
            .context("Failed to list tools from MCP server")?;
        let tools = tool_names(&serde_json::to_value(&listing).unwrap_or(Value::Null));
        if tools.is_empty() {
            log_warn!("[mcp] {} reported no tools", spec);
        }

        log_info!(
            "[mcp] connected {} ({} tools, {} ms)",
            spec,
            tools.len(),
            started.elapsed().as_millis()
        );
        Ok(RmcpSession { service, tools })
    }
}
