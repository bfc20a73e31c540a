/*!
`params.rs`

Typed parameter records (one per server tool) and the planner that turns a
tokenized command line into either the help screen or a single tool
invocation.

Records serialize with camelCase keys. Optional flags are `Option<FlagValue>`
and are left out of the argument object when absent; flag values otherwise
pass through as given (`--year` alone is sent as `true`).

Each command keeps its own literal defaults, even where they disagree
(`samples --beta` is a string defaulting to "include" while `updates --beta`
is a boolean defaulting to true).
*/

use serde::Serialize;
use serde_json::{Map, Value};

use super::args::{FlagValue, ParsedArgs, to_bool};
use super::command::{Command, WwdcCommand};
use crate::error::CliError;

/* -------------------------------------------------------------------------- */
/* Plan                                                                       */
/* -------------------------------------------------------------------------- */

/// A fully validated tool call: name plus JSON argument object.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub tool: &'static str,
    pub arguments: Map<String, Value>,
}

impl Invocation {
    fn new(tool: &'static str, params: impl Serialize) -> Result<Self, CliError> {
        let arguments = match serde_json::to_value(params) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(CliError::Fatal(anyhow::anyhow!(
                    "parameters for {tool} serialized to {other}, expected an object"
                )));
            }
            Err(e) => return Err(CliError::Fatal(e.into())),
        };
        Ok(Self { tool, arguments })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Help,
    Invoke(Invocation),
}

/// Decide what a command line asks for. Pure: never touches the server, so
/// usage errors are reported before any process is spawned.
pub fn plan(args: &ParsedArgs) -> Result<Plan, CliError> {
    let Some(name) = args.positional.first() else {
        return Ok(Plan::Help);
    };
    if args.is_set("help") {
        return Ok(Plan::Help);
    }
    let command =
        Command::from_name(name).ok_or_else(|| CliError::UnknownCommand(name.clone()))?;
    let rest = &args.positional[1..];

    let invocation = match command {
        Command::Wwdc => return plan_wwdc(rest, args).map(Plan::Invoke),
        Command::Search => {
            let query = rest.join(" ");
            if query.is_empty() {
                return Err(usage(command));
            }
            Invocation::new(
                tool(command),
                SearchParams {
                    query,
                    kind: args.or_default("type", "all"),
                },
            )?
        }
        Command::Doc => {
            let url = required(rest, 0, command)?;
            Invocation::new(
                tool(command),
                DocContentParams {
                    url,
                    include_related_apis: args.bool_or("related", false),
                    include_references: args.bool_or("refs", false),
                    include_similar_apis: args.bool_or("similar", false),
                    include_platform_analysis: args.bool_or("platform", false),
                },
            )?
        }
        Command::Technologies => Invocation::new(
            tool(command),
            TechnologiesParams {
                category: args.raw("category"),
                language: args.raw("language"),
                include_beta: args.bool_or("beta", true),
                limit: args.int_or("limit", 200),
            },
        )?,
        Command::Symbols => {
            let framework = required(rest, 0, command)?;
            Invocation::new(
                tool(command),
                SymbolsParams {
                    framework,
                    symbol_type: args.or_default("type", "all"),
                    name_pattern: args.raw("pattern"),
                    language: args.or_default("language", "swift"),
                    limit: args.int_or("limit", 50),
                },
            )?
        }
        Command::Related => {
            let api_url = required(rest, 0, command)?;
            Invocation::new(
                tool(command),
                RelatedApisParams {
                    api_url,
                    include_inherited: !args.is_set("no-inherited"),
                    include_conformance: !args.is_set("no-conformance"),
                    include_see_also: !args.is_set("no-see-also"),
                },
            )?
        }
        Command::References => {
            let source_url = required(rest, 0, command)?;
            Invocation::new(
                tool(command),
                ReferencesParams {
                    source_url,
                    max_references: args.int_or("max", 20),
                    filter_by_type: args.or_default("filter", "all"),
                },
            )?
        }
        Command::Compatibility => {
            let api_url = required(rest, 0, command)?;
            Invocation::new(
                tool(command),
                CompatibilityParams {
                    api_url,
                    compare_mode: args.or_default("mode", "single"),
                    include_related: args.bool_or("related", false),
                },
            )?
        }
        Command::Similar => {
            let api_url = required(rest, 0, command)?;
            Invocation::new(
                tool(command),
                SimilarApisParams {
                    api_url,
                    search_depth: args.or_default("depth", "medium"),
                    filter_by_category: args.raw("category"),
                    include_alternatives: !args.is_set("no-alternatives"),
                },
            )?
        }
        Command::Updates => Invocation::new(
            tool(command),
            UpdatesParams {
                category: args.or_default("category", "all"),
                technology: args.raw("tech"),
                year: args.raw("year"),
                search_query: args.raw("query"),
                include_beta: args.bool_or("beta", true),
                limit: args.int_or("limit", 50),
            },
        )?,
        Command::Overviews => Invocation::new(
            tool(command),
            OverviewsParams {
                category: args.raw("category"),
                platform: args.or_default("platform", "all"),
                search_query: args.raw("query"),
                include_subcategories: args.bool_or("subcategories", true),
                limit: args.int_or("limit", 50),
            },
        )?,
        Command::Samples => {
            let joined = rest.join(" ");
            let search_query = match args.flag("query") {
                Some(q) if q.is_set() => Some(q.clone()),
                _ if !joined.is_empty() => Some(FlagValue::Text(joined)),
                _ => None,
            };
            Invocation::new(
                tool(command),
                SampleCodeParams {
                    framework: args.raw("framework"),
                    beta: args.or_default("beta", "include"),
                    search_query,
                    limit: args.int_or("limit", 50),
                },
            )?
        }
    };
    Ok(Plan::Invoke(invocation))
}

fn plan_wwdc(rest: &[String], args: &ParsedArgs) -> Result<Invocation, CliError> {
    let name = rest.first().map(String::as_str).unwrap_or("");
    let sub = WwdcCommand::from_name(name).ok_or_else(|| {
        CliError::UnknownWwdcSubcommand(if name.is_empty() {
            "(none)".to_string()
        } else {
            name.to_string()
        })
    })?;
    let rest = &rest[1..];

    match sub {
        WwdcCommand::List => Invocation::new(
            sub.tool(),
            WwdcListParams {
                year: args.raw("year"),
                topic: args.raw("topic"),
                has_code: args.flag("has-code").map(|v| to_bool(Some(v), true)),
                limit: args.int_or("limit", 50),
            },
        ),
        WwdcCommand::Search => {
            let query = rest.join(" ");
            if query.is_empty() {
                return Err(wwdc_usage(sub));
            }
            Invocation::new(
                sub.tool(),
                WwdcSearchParams {
                    query,
                    search_in: args.or_default("in", "both"),
                    year: args.raw("year"),
                    language: args.raw("language"),
                    limit: args.int_or("limit", 20),
                },
            )
        }
        WwdcCommand::Video => {
            let (year, video_id) = year_and_video(rest, sub)?;
            Invocation::new(
                sub.tool(),
                WwdcVideoParams {
                    year,
                    video_id,
                    include_transcript: !args.is_set("no-transcript"),
                    include_code: !args.is_set("no-code"),
                },
            )
        }
        WwdcCommand::Code => Invocation::new(
            sub.tool(),
            WwdcCodeParams {
                framework: args.raw("framework"),
                topic: args.raw("topic"),
                year: args.raw("year"),
                language: args.raw("language"),
                limit: args.int_or("limit", 30),
            },
        ),
        WwdcCommand::Topics => Invocation::new(
            sub.tool(),
            WwdcTopicsParams {
                topic_id: args.raw("topic"),
                include_videos: args.bool_or("videos", true),
                year: args.raw("year"),
                limit: args.int_or("limit", 20),
            },
        ),
        WwdcCommand::Related => {
            let (year, video_id) = year_and_video(rest, sub)?;
            Invocation::new(
                sub.tool(),
                WwdcRelatedParams {
                    video_id,
                    year,
                    include_explicit_related: !args.is_set("no-explicit"),
                    include_topic_related: !args.is_set("no-topic"),
                    include_year_related: args.bool_or("year-related", false),
                    limit: args.int_or("limit", 15),
                },
            )
        }
        WwdcCommand::Years => Invocation::new(sub.tool(), NoParams {}),
    }
}

/* -------------------------------------------------------------------------- */
/* Arity helpers                                                              */
/* -------------------------------------------------------------------------- */

fn tool(command: Command) -> &'static str {
    command.tool().unwrap_or_default()
}

fn usage(command: Command) -> CliError {
    CliError::Usage(command.usage().unwrap_or_default())
}

fn wwdc_usage(sub: WwdcCommand) -> CliError {
    CliError::Usage(sub.usage().unwrap_or_default())
}

/// Positional at `idx`; missing or empty is a usage error.
fn required(rest: &[String], idx: usize, command: Command) -> Result<String, CliError> {
    match rest.get(idx) {
        Some(v) if !v.is_empty() => Ok(v.clone()),
        _ => Err(usage(command)),
    }
}

fn year_and_video(rest: &[String], sub: WwdcCommand) -> Result<(String, String), CliError> {
    match (rest.first(), rest.get(1)) {
        (Some(year), Some(id)) if !year.is_empty() && !id.is_empty() => {
            Ok((year.clone(), id.clone()))
        }
        _ => Err(wwdc_usage(sub)),
    }
}

/* -------------------------------------------------------------------------- */
/* Records                                                                    */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: FlagValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocContentParams {
    pub url: String,
    pub include_related_apis: bool,
    pub include_references: bool,
    pub include_similar_apis: bool,
    pub include_platform_analysis: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologiesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<FlagValue>,
    pub include_beta: bool,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolsParams {
    pub framework: String,
    pub symbol_type: FlagValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<FlagValue>,
    pub language: FlagValue,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedApisParams {
    pub api_url: String,
    pub include_inherited: bool,
    pub include_conformance: bool,
    pub include_see_also: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencesParams {
    pub source_url: String,
    pub max_references: i64,
    pub filter_by_type: FlagValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityParams {
    pub api_url: String,
    pub compare_mode: FlagValue,
    pub include_related: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarApisParams {
    pub api_url: String,
    pub search_depth: FlagValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by_category: Option<FlagValue>,
    pub include_alternatives: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesParams {
    pub category: FlagValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<FlagValue>,
    pub include_beta: bool,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FlagValue>,
    pub platform: FlagValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<FlagValue>,
    pub include_subcategories: bool,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleCodeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<FlagValue>,
    pub beta: FlagValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<FlagValue>,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WwdcListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_code: Option<bool>,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WwdcSearchParams {
    pub query: String,
    pub search_in: FlagValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<FlagValue>,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WwdcVideoParams {
    pub year: String,
    pub video_id: String,
    pub include_transcript: bool,
    pub include_code: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WwdcCodeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<FlagValue>,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WwdcTopicsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<FlagValue>,
    pub include_videos: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FlagValue>,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WwdcRelatedParams {
    pub video_id: String,
    pub year: String,
    pub include_explicit_related: bool,
    pub include_topic_related: bool,
    pub include_year_related: bool,
    pub limit: i64,
}

/// `list_wwdc_years` takes no arguments.
#[derive(Debug, Serialize)]
pub struct NoParams {}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
