use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::evaluation::OutputFormat;

/// Command line interface definition for raimes.
#[derive(Parser, Debug)]
#[command(name = "raimes")]
#[command(about = "Score mining-operations questionnaires")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the text-generation collaborator.
#[derive(Args, Debug, Clone, Default)]
pub struct LlmArgs {
    /// Provider to use: gemini, claude or offline
    #[arg(long = "llm-provider", global = true)]
    pub provider: Option<String>,

    /// Model name passed to the provider
    #[arg(long = "llm-model", global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a questionnaire and print the report
    Evaluate(EvaluateArgs),
    /// Send a free-form prompt to the model
    Ask(AskArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Questionnaire answers as JSON or plain text
    #[arg(short, long, conflicts_with = "input")]
    pub answers: Option<String>,

    /// Read answers from a file ("-" for stdin, the default)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Supporting document to include in the analysis
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: FormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// Prompt to send; starts an interactive session when omitted
    #[arg(short, long)]
    pub prompt: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    Pretty,
    /// JSON document
    Json,
    /// Markdown report
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pretty => OutputFormat::Pretty,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_evaluate_with_globals() {
        let cli = Cli::try_parse_from([
            "raimes",
            "evaluate",
            "--answers",
            "{}",
            "--format",
            "json",
            "-vv",
            "--llm-provider",
            "offline",
        ])
        .unwrap();

        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.llm.provider.as_deref(), Some("offline"));
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.answers.as_deref(), Some("{}"));
        assert_eq!(args.format, FormatArg::Json);
    }

    #[test]
    fn answers_and_input_conflict() {
        let parsed = Cli::try_parse_from([
            "raimes", "evaluate", "--answers", "{}", "--input", "a.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn ask_prompt_is_optional() {
        let cli = Cli::try_parse_from(["raimes", "ask"]).unwrap();
        assert!(matches!(cli.command, Command::Ask(AskArgs { prompt: None })));
    }
}
