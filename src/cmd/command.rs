/*!
Command names for the CLI.

Top level: search, doc, technologies, symbols, related, references,
compatibility, similar, updates, overviews, samples, wwdc.
`wwdc` nests: list, search, video, code, topics, related, years.

Each variant maps to exactly one server tool and (where it takes required
positionals) one literal usage line.
*/

use std::fmt;

pub const USAGE: &str = "apple-docs - Apple Developer Documentation CLI

USAGE:
  apple-docs [global options] <command> [arguments] [flags]

COMMANDS:
  search <query>              Search Apple docs
  doc <url>                   Get documentation content
  technologies                List Apple technologies
  symbols <framework>         Search framework symbols
  related <url>               Find related APIs
  references <url>            Resolve API references
  compatibility <url>         Check platform compatibility
  similar <url>               Find similar APIs
  updates                     Get documentation updates
  overviews                   Get technology overviews
  samples                     Browse sample code
  wwdc list                   List WWDC videos
  wwdc search <query>         Search WWDC transcripts/code
  wwdc video <year> <id>      Get WWDC video details
  wwdc code                   Browse WWDC code examples
  wwdc topics                 Browse WWDC topics
  wwdc related <year> <id>    Find related WWDC videos
  wwdc years                  List WWDC years

GLOBAL OPTIONS (before <command>):
  -t, --target <TARGET>       Server launch command (env APPLE_DOCS_TARGET)
                              default: npx -y @kimsungwhee/apple-docs-mcp
  -v, --verbose               More logging; also shows server stderr
  -q, --quiet                 Errors only
  -V, --version               Print version

Run 'apple-docs <command> --help' for command-specific help.";

/// Top-level command.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Command {
    Search,
    Doc,
    Technologies,
    Symbols,
    Related,
    References,
    Compatibility,
    Similar,
    Updates,
    Overviews,
    Samples,
    Wwdc,
}

impl Command {
    pub const fn variants() -> &'static [Command] {
        &[
            Command::Search,
            Command::Doc,
            Command::Technologies,
            Command::Symbols,
            Command::Related,
            Command::References,
            Command::Compatibility,
            Command::Similar,
            Command::Updates,
            Command::Overviews,
            Command::Samples,
            Command::Wwdc,
        ]
    }

    /// Exact (case-sensitive) lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::variants().iter().copied().find(|c| c.name() == name)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Command::Search => "search",
            Command::Doc => "doc",
            Command::Technologies => "technologies",
            Command::Symbols => "symbols",
            Command::Related => "related",
            Command::References => "references",
            Command::Compatibility => "compatibility",
            Command::Similar => "similar",
            Command::Updates => "updates",
            Command::Overviews => "overviews",
            Command::Samples => "samples",
            Command::Wwdc => "wwdc",
        }
    }

    /// Server tool invoked by this command. `wwdc` delegates to its subcommand.
    pub const fn tool(&self) -> Option<&'static str> {
        Some(match self {
            Command::Search => "search_apple_docs",
            Command::Doc => "get_apple_doc_content",
            Command::Technologies => "list_technologies",
            Command::Symbols => "search_framework_symbols",
            Command::Related => "get_related_apis",
            Command::References => "resolve_references_batch",
            Command::Compatibility => "get_platform_compatibility",
            Command::Similar => "find_similar_apis",
            Command::Updates => "get_documentation_updates",
            Command::Overviews => "get_technology_overviews",
            Command::Samples => "get_sample_code",
            Command::Wwdc => return None,
        })
    }

    /// Usage line printed when required positionals are missing.
    pub const fn usage(&self) -> Option<&'static str> {
        Some(match self {
            Command::Search => {
                "Usage: apple-docs search <query> [--type all|documentation|sample]"
            }
            Command::Doc => {
                "Usage: apple-docs doc <url> [--related] [--refs] [--similar] [--platform]"
            }
            Command::Symbols => {
                "Usage: apple-docs symbols <framework> [--type <type>] [--pattern <pat>] [--language swift|occ] [--limit N]"
            }
            Command::Related => {
                "Usage: apple-docs related <url> [--no-inherited] [--no-conformance] [--no-see-also]"
            }
            Command::References => {
                "Usage: apple-docs references <url> [--max N] [--filter <type>]"
            }
            Command::Compatibility => {
                "Usage: apple-docs compatibility <url> [--mode single|framework] [--related]"
            }
            Command::Similar => {
                "Usage: apple-docs similar <url> [--depth shallow|medium|deep] [--category <cat>] [--no-alternatives]"
            }
            Command::Technologies
            | Command::Updates
            | Command::Overviews
            | Command::Samples
            | Command::Wwdc => return None,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `wwdc` subcommand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WwdcCommand {
    List,
    Search,
    Video,
    Code,
    Topics,
    Related,
    Years,
}

impl WwdcCommand {
    /// Order matters: it is the order listed in the "Available:" hint.
    pub const fn variants() -> &'static [WwdcCommand] {
        &[
            WwdcCommand::List,
            WwdcCommand::Search,
            WwdcCommand::Video,
            WwdcCommand::Code,
            WwdcCommand::Topics,
            WwdcCommand::Related,
            WwdcCommand::Years,
        ]
    }

    pub fn names() -> Vec<&'static str> {
        Self::variants().iter().map(|c| c.name()).collect()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::variants().iter().copied().find(|c| c.name() == name)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            WwdcCommand::List => "list",
            WwdcCommand::Search => "search",
            WwdcCommand::Video => "video",
            WwdcCommand::Code => "code",
            WwdcCommand::Topics => "topics",
            WwdcCommand::Related => "related",
            WwdcCommand::Years => "years",
        }
    }

    pub const fn tool(&self) -> &'static str {
        match self {
            WwdcCommand::List => "list_wwdc_videos",
            WwdcCommand::Search => "search_wwdc_content",
            WwdcCommand::Video => "get_wwdc_video",
            WwdcCommand::Code => "get_wwdc_code_examples",
            WwdcCommand::Topics => "browse_wwdc_topics",
            WwdcCommand::Related => "find_related_wwdc_videos",
            WwdcCommand::Years => "list_wwdc_years",
        }
    }

    pub const fn usage(&self) -> Option<&'static str> {
        Some(match self {
            WwdcCommand::Search => {
                "Usage: apple-docs wwdc search <query> [--in transcript|code|both] [--year Y] [--language L] [--limit N]"
            }
            WwdcCommand::Video => {
                "Usage: apple-docs wwdc video <year> <videoId> [--no-transcript] [--no-code]"
            }
            WwdcCommand::Related => {
                "Usage: apple-docs wwdc related <year> <videoId> [--no-explicit] [--no-topic] [--year-related] [--limit N]"
            }
            WwdcCommand::List | WwdcCommand::Code | WwdcCommand::Topics | WwdcCommand::Years => {
                return None;
            }
        })
    }
}

impl fmt::Display for WwdcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wwdc {}", self.name())
    }
}

/* --------------------------------- Tests ---------------------------------- */
