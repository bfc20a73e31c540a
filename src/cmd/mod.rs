/*!
Command layer: everything between the raw tokens after the global options
and a single tool call.

Layout:
  src/cmd/
    mod.rs        (this file; module declarations + execute)
    args.rs       (tokenizer + flag coercion)
    command.rs    (Command / WwdcCommand names, tools, usage text)
    params.rs     (typed parameter records + planner)
    dispatch.rs   (Dispatcher over a ToolProvider)
    shared.rs     (JSON helpers over MCP payloads)

Conventions:
  - Arity and unknown-name checks happen in `params::plan`, before any
    server process exists.
  - Every failure is a `CliError` and maps to exit status 1.
*/

pub mod args;
pub mod command;
pub mod dispatch;
pub mod params;
pub mod shared;

pub use dispatch::Dispatcher;

use crate::mcp::McpProvider;

/// Run one command line against the server launched by `target` and return
/// the process exit code. The target is only parsed, and the server only
/// started, if a tool is called.
pub async fn execute(target: String, argv: Vec<String>, show_server_stderr: bool) -> i32 {
    let provider = McpProvider::new(target, show_server_stderr);
    let code = Dispatcher::new(&provider)
        .execute(&argv, &mut std::io::stdout(), &mut std::io::stderr())
        .await;
    provider.shutdown().await;
    code
}
