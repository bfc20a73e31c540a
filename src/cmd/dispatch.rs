/*!
`dispatch.rs`

Runs one command line against a `ToolProvider`:

  argv -> ParsedArgs -> Plan -> (help text | provider call) -> text to print

The provider is borrowed, never created here, so tests can hand in a stub and
the binary hands in the lazily connected `McpProvider`.
*/

use std::io::Write;

use super::args::ParsedArgs;
use super::command::USAGE;
use super::params::{Plan, plan};
use crate::error::CliError;
use crate::mcp::ToolProvider;
use crate::{log_debug, log_trace};

pub struct Dispatcher<'a, P> {
    provider: &'a P,
}

impl<'a, P: ToolProvider> Dispatcher<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Text for stdout on success; the error otherwise.
    pub async fn run<S: AsRef<str>>(&self, argv: &[S]) -> Result<String, CliError> {
        let parsed = ParsedArgs::parse(argv);
        log_trace!(
            "parsed positional={:?} flags={:?}",
            parsed.positional,
            parsed.flags
        );

        let invocation = match plan(&parsed)? {
            Plan::Help => return Ok(USAGE.to_string()),
            Plan::Invoke(inv) => inv,
        };

        log_debug!("dispatch {} ({} args)", invocation.tool, invocation.arguments.len());
        let output = self
            .provider
            .call(invocation.tool, invocation.arguments)
            .await?;

        if output.is_error {
            return Err(CliError::ToolFailed(output.joined()));
        }
        Ok(output.joined())
    }

    /// `run` plus printing; returns the process exit code.
    pub async fn execute<S: AsRef<str>>(
        &self,
        argv: &[S],
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> i32 {
        match self.run(argv).await {
            Ok(text) => match writeln!(out, "{text}") {
                Ok(()) => 0,
                Err(e) => {
                    let _ = writeln!(err, "Fatal: {e}");
                    1
                }
            },
            Err(e) => {
                let _ = e.report(out, err);
                e.exit_code()
            }
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::shared::ToolOutput;
    use crate::mcp::McpProvider;
    use serde_json::{Map, Value, json};
    use std::sync::Mutex;

    /// Records calls; answers every tool with the same canned result.
    struct StubProvider {
        reply: Result<ToolOutput, fn() -> CliError>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl StubProvider {
        fn answering(output: ToolOutput) -> Self {
            Self {
                reply: Ok(output),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> CliError) -> Self {
            Self {
                reply: Err(make),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ToolProvider for StubProvider {
        async fn call(
            &self,
            tool: &str,
            arguments: Map<String, Value>,
        ) -> Result<ToolOutput, CliError> {
            self.calls
                .lock()
                .unwrap()
                .push((tool.to_string(), Value::Object(arguments)));
            match &self.reply {
                Ok(out) => Ok(out.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    async fn execute<P: ToolProvider>(provider: &P, argv: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = Dispatcher::new(provider)
            .execute(argv, &mut out, &mut err)
            .await;
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn search_prints_joined_content() {
        let stub = StubProvider::answering(ToolOutput::ok(["A", "B"]));
        let (code, out, err) = execute(&stub, &["search", "foo"]).await;
        assert_eq!(code, 0);
        assert_eq!(out, "A\nB\n");
        assert!(err.is_empty());
        assert_eq!(
            stub.calls(),
            vec![(
                "search_apple_docs".to_string(),
                json!({"query": "foo", "type": "all"})
            )]
        );
    }

    #[tokio::test]
    async fn help_needs_no_provider() {
        let stub = StubProvider::answering(ToolOutput::default());
        for argv in [&[][..], &["--help"][..], &["wwdc", "list", "--help"][..]] {
            let (code, out, _) = execute(&stub, argv).await;
            assert_eq!(code, 0);
            assert_eq!(out, format!("{USAGE}\n"));
        }
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_query_is_usage_error_without_call() {
        let stub = StubProvider::failing(|| CliError::Load(anyhow::anyhow!("must not load")));
        let (code, out, err) = execute(&stub, &["search"]).await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "Usage: apple-docs search <query> [--type all|documentation|sample]\n"
        );
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn wwdc_related_without_video_id() {
        let stub = StubProvider::answering(ToolOutput::default());
        let (code, _, err) = execute(&stub, &["wwdc", "related", "2024"]).await;
        assert_eq!(code, 1);
        assert!(err.starts_with("Usage: apple-docs wwdc related <year> <videoId>"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_prints_usage_block() {
        let stub = StubProvider::answering(ToolOutput::default());
        let (code, out, err) = execute(&stub, &["bogus"]).await;
        assert_eq!(code, 1);
        assert_eq!(err, "Unknown command: bogus\n");
        assert_eq!(out, format!("{USAGE}\n"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_wwdc_subcommand_lists_seven() {
        let stub = StubProvider::answering(ToolOutput::default());
        let (code, _, err) = execute(&stub, &["wwdc", "bogus"]).await;
        assert_eq!(code, 1);
        assert!(err.contains("Unknown wwdc subcommand: bogus"));
        assert!(err.contains("Available: list, search, video, code, topics, related, years"));
    }

    #[tokio::test]
    async fn error_flagged_result_goes_to_stderr() {
        let stub = StubProvider::answering(ToolOutput {
            is_error: true,
            content: vec!["Video not found".into(), "try another year".into()],
        });
        let (code, out, err) = execute(&stub, &["wwdc", "video", "2019", "000"]).await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(err, "Video not found\ntry another year\n");
        assert_eq!(stub.calls()[0].0, "get_wwdc_video");
    }

    #[tokio::test]
    async fn provider_failures_are_reported() {
        let stub = StubProvider::failing(|| CliError::Invocation("connection closed".into()));
        let (code, _, err) = execute(&stub, &["wwdc", "years"]).await;
        assert_eq!(code, 1);
        assert_eq!(err, "Error: connection closed\n");
        assert_eq!(stub.calls(), vec![("list_wwdc_years".to_string(), json!({}))]);

        let stub = StubProvider::failing(|| CliError::UnknownTool("list_wwdc_years".into()));
        let (code, _, err) = execute(&stub, &["wwdc", "years"]).await;
        assert_eq!(code, 1);
        assert_eq!(err, "Unknown tool: list_wwdc_years\n");

        let stub = StubProvider::failing(|| CliError::Load(anyhow::anyhow!("npx: not found")));
        let (code, _, err) = execute(&stub, &["technologies"]).await;
        assert_eq!(code, 1);
        assert!(err.contains("Detail: npx: not found"));
    }

    #[tokio::test]
    async fn run_returns_text() {
        let stub = StubProvider::answering(ToolOutput::ok(["2024", "2023"]));
        let text = Dispatcher::new(&stub)
            .run(&["wwdc".to_string(), "years".to_string()])
            .await
            .unwrap();
        assert_eq!(text, "2024\n2023");
    }

    #[tokio::test]
    async fn unparsable_target_only_matters_once_a_tool_is_called() {
        let provider = McpProvider::new(r#"node "unterminated"#, false);

        let (code, out, _) = execute(&provider, &["--help"]).await;
        assert_eq!(code, 0);
        assert_eq!(out, format!("{USAGE}\n"));

        let (code, out, err) = execute(&provider, &["search"]).await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("Usage: apple-docs search <query>"));

        let (code, _, err) = execute(&provider, &["search", "swiftui"]).await;
        assert_eq!(code, 1);
        assert!(err.starts_with(r#"Invalid target 'node "unterminated'"#), "{err}");

        provider.shutdown().await;
    }
}
