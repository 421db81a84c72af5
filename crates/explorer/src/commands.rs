//! Line commands driving the session
//!
//! Each line stands in for one pointer or keyboard action of a graphical
//! front end: `enter A` is the pointer entering node A, `stage` a click on
//! empty canvas, and so on.

use std::path::PathBuf;
use thiserror::Error;

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Enter(String),
    Leave,
    Click(String),
    Stage,
    /// Title search
    Search(String),
    /// Focus a search hit
    Select(String),
    /// Semantic lookup from a free-text description
    Think(String),
    /// Follow-up directions for a paper (default: the paper on display)
    Suggest(Option<String>),
    Compare(String, String),
    Save(Option<String>),
    Saved,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
enter <id>        pointer enters a node
leave             pointer leaves the node
click <id>        click a node (sticky focus)
stage             click empty canvas (clears the click)
search <text>     search ids and titles
select <id>       focus a search result
think <text>      jump to the paper closest to a description
suggest [id]      follow-up directions for a paper
compare <a> <b>   key differences between two papers
save [id]         add a paper to the saved list
saved             show saved papers
export [path]     write the positioned graph as JSON
quit              end the session";

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word.to_ascii_lowercase().as_str() {
            "enter" => Command::Enter(required(arg, "enter", "a paper id")?),
            "leave" => Command::Leave,
            "click" => Command::Click(required(arg, "click", "a paper id")?),
            "stage" => Command::Stage,
            "search" | "find" => Command::Search(required(arg, "search", "a query")?),
            "select" => Command::Select(required(arg, "select", "a paper id")?),
            "think" => Command::Think(required(arg, "think", "a description")?),
            "suggest" => Command::Suggest(arg),
            "compare" => {
                let mut ids = rest.split_whitespace();
                match (ids.next(), ids.next()) {
                    (Some(a), Some(b)) => Command::Compare(a.to_string(), b.to_string()),
                    _ => {
                        return Err(CommandError::MissingArgument {
                            command: "compare",
                            expected: "two paper ids",
                        })
                    }
                }
            }
            "save" => Command::Save(arg),
            "saved" => Command::Saved,
            "export" => Command::Export(arg.map(PathBuf::from)),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn required(arg: Option<String>, command: &'static str, expected: &'static str) -> Result<String, CommandError> {
    arg.ok_or(CommandError::MissingArgument { command, expected })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_focus_commands() {
        assert_eq!(Command::parse("enter PMC1").unwrap(), Some(Command::Enter("PMC1".into())));
        assert_eq!(Command::parse("  CLICK   PMC2 ").unwrap(), Some(Command::Click("PMC2".into())));
        assert_eq!(Command::parse("leave").unwrap(), Some(Command::Leave));
        assert_eq!(Command::parse("stage").unwrap(), Some(Command::Stage));
    }

    #[test]
    fn test_free_text_keeps_spaces() {
        assert_eq!(
            Command::parse("think bone loss in   microgravity").unwrap(),
            Some(Command::Think("bone loss in   microgravity".into()))
        );
    }

    #[test]
    fn test_optional_arguments() {
        assert_eq!(Command::parse("suggest").unwrap(), Some(Command::Suggest(None)));
        assert_eq!(Command::parse("save P1").unwrap(), Some(Command::Save(Some("P1".into()))));
        assert_eq!(
            Command::parse("export out/graph.json").unwrap(),
            Some(Command::Export(Some(PathBuf::from("out/graph.json"))))
        );
    }

    #[test]
    fn test_compare_needs_two_ids() {
        assert_eq!(
            Command::parse("compare A B").unwrap(),
            Some(Command::Compare("A".into(), "B".into()))
        );
        assert!(matches!(
            Command::parse("compare A"),
            Err(CommandError::MissingArgument { command: "compare", .. })
        ));
    }

    #[test]
    fn test_errors_and_blank_lines() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(matches!(Command::parse("click"), Err(CommandError::MissingArgument { .. })));
        assert_eq!(Command::parse("fly away"), Err(CommandError::Unknown("fly".into())));
    }
}
