use anyhow::{Context, Result};
use clap::Parser;

mod cmd;
mod error;
mod mcp;
mod utils;

use error::CliError;

/// apple-docs - Apple Developer Documentation CLI
///
/// Thin front end over the apple-docs MCP server: each command becomes one
/// tool call, and the tool's text content is printed.
///
/// Layout:
///   apple-docs [global options] <command> [arguments] [--flag [value]]...
///
/// Only the leading run of global options is given to clap (see
/// `split_globals`). Everything from the first other token on, leading
/// `--name` flags included, is handed verbatim to `cmd::args`, where `--name`
/// is a flag (optionally followed by a value) and everything else is
/// positional.
///
/// Global flags / env:
///   -t / --target     Server launch command (or APPLE_DOCS_TARGET env)
///   -v / -vv / -vvv   Increase verbosity (-v also shows the server's stderr)
///   -q / --quiet      Errors only
///
/// Examples:
///   apple-docs search "SwiftUI List"
///   apple-docs --type sample search swiftui
///   apple-docs doc https://developer.apple.com/documentation/swiftui/list --related
///   apple-docs wwdc video 2024 10136 --no-transcript
///   apple-docs -t "node ./apple-docs-mcp/dist/index.js" wwdc years
#[derive(Parser, Debug)]
#[command(
    name = "apple-docs",
    version,
    about = "apple-docs - Apple Developer Documentation CLI",
    disable_help_flag = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence everything except errors
    #[arg(short, long)]
    quiet: bool,

    /// Server launch command (local command line)
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    target: Option<String>,
}

/// Split the arguments (without argv[0]) into the leading global options and
/// the command line proper. The first token that is not a global option ends
/// the globals, so `--type sample search x` is all command line.
fn split_globals(args: &[String]) -> (&[String], &[String]) {
    let mut i = 0;
    while let Some(tok) = args.get(i) {
        let step = match tok.as_str() {
            "-t" | "--target" => 2,
            "--verbose" | "--quiet" | "--version" => 1,
            t if t.starts_with("--target=") => 1,
            t if t.starts_with("-t") && !t.starts_with("--") => 1,
            t if t.len() > 1
                && t.starts_with('-')
                && t[1..].chars().all(|c| matches!(c, 'v' | 'q' | 'V')) =>
            {
                1
            }
            _ => break,
        };
        i = (i + step).min(args.len());
    }
    args.split_at(i)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (argv0, rest) = match args.split_first() {
        Some((first, rest)) => (first.clone(), rest),
        None => ("apple-docs".to_string(), &[][..]),
    };
    let (globals, command_line) = split_globals(rest);

    let cli = match Cli::try_parse_from(std::iter::once(&argv0).chain(globals)) {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let code = match run(cli, command_line.to_vec()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", CliError::Fatal(e));
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, argv: Vec<String>) -> Result<i32> {
    // Effective target: CLI flag > APPLE_DOCS_TARGET env > default.
    // Parsed lazily by the provider, so help and usage errors never depend on it.
    let target = cli
        .target
        .or_else(|| {
            std::env::var("APPLE_DOCS_TARGET")
                .ok()
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| mcp::DEFAULT_TARGET.to_string());
    log_debug!("target '{target}', argv {argv:?}");

    let show_server_stderr = utils::logging::enabled(utils::logging::LogLevel::Info);
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    Ok(rt.block_on(cmd::execute(target, argv, show_server_stderr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::args::ParsedArgs;
    use crate::cmd::params::{Plan, plan};
    use serde_json::json;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn leading_command_flags_are_not_globals() {
        let args = strings(&["-v", "--type", "sample", "search", "swiftui"]);
        let (globals, rest) = split_globals(&args);
        assert_eq!(globals, ["-v"]);
        assert_eq!(rest, ["--type", "sample", "search", "swiftui"]);

        let args = strings(&["--limit", "4"]);
        let (globals, rest) = split_globals(&args);
        assert!(globals.is_empty());
        assert_eq!(rest, ["--limit", "4"]);
    }

    #[test]
    fn target_forms_and_clusters() {
        let args = strings(&["-t", "node x.js", "-vv", "--target=npx y", "-tnode", "-q", "wwdc", "-v"]);
        let (globals, rest) = split_globals(&args);
        assert_eq!(globals.len(), 6);
        assert_eq!(rest, ["wwdc", "-v"]);

        // dangling -t is left for clap to reject
        let args = strings(&["-t"]);
        let (globals, rest) = split_globals(&args);
        assert_eq!(globals, ["-t"]);
        assert!(rest.is_empty());
        assert!(Cli::try_parse_from(std::iter::once("apple-docs").chain(["-t"])).is_err());
    }

    #[test]
    fn globals_parse_with_clap() {
        let args = strings(&["-vv", "-q", "--target", "node ./dist/index.js", "search", "x"]);
        let (globals, _) = split_globals(&args);
        let cli = Cli::try_parse_from(std::iter::once(&"apple-docs".to_string()).chain(globals))
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert_eq!(cli.target.as_deref(), Some("node ./dist/index.js"));
    }

    #[test]
    fn leading_flag_reaches_the_planner() {
        let args = strings(&["--type", "sample", "search", "swiftui"]);
        let (_, rest) = split_globals(&args);
        let Plan::Invoke(inv) = plan(&ParsedArgs::parse(rest)).unwrap() else {
            panic!("expected an invocation");
        };
        assert_eq!(inv.tool, "search_apple_docs");
        assert_eq!(
            serde_json::Value::Object(inv.arguments),
            json!({"query": "swiftui", "type": "sample"})
        );

        // flag only, no command: usage
        let args = strings(&["--limit", "4"]);
        let (_, rest) = split_globals(&args);
        assert!(matches!(plan(&ParsedArgs::parse(rest)).unwrap(), Plan::Help));
    }
}
