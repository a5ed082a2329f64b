use std::sync::LazyLock;

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

// ---------------------------------------------------------------------------
// Player commands
// ---------------------------------------------------------------------------

/// A line of player input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based index into the listed choices (or roles).
    Pick(usize),
    /// A choice id or role name typed out in full.
    Name(String),
    Back,
    Restart,
    ChangeRole,
    /// Show the quick reference, or one entry of it by key.
    Reference(Option<String>),
    Quit,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

const COMMAND_PATTERN: &str = r"(?ix)^(?:
    (?P<number>[0-9]+)
    | (?P<back>b|back|go\ back)
    | (?P<restart>r|restart|start\ over)
    | (?P<role>c|role|change\ role)
    | (?:\?|ref|reference)(?P<reference>(?:\ (?P<topic>[a-z][a-z-]*))?)
    | (?P<quit>q|quit|exit)
    | (?P<name>[a-z][a-z0-9-]*)
)$";

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMMAND_PATTERN).expect("command pattern must compile"));

pub fn parse_command(raw: &str) -> Result<Command> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let caps = COMMAND_RE
        .captures(&normalized)
        .with_context(|| format!("unrecognised input: '{}'", raw.trim()))?;

    let command = if let Some(number) = caps.name("number") {
        let index = number
            .as_str()
            .parse()
            .with_context(|| format!("number out of range: {}", number.as_str()))?;
        Command::Pick(index)
    } else if caps.name("back").is_some() {
        Command::Back
    } else if caps.name("restart").is_some() {
        Command::Restart
    } else if caps.name("role").is_some() {
        Command::ChangeRole
    } else if caps.name("reference").is_some() {
        Command::Reference(caps.name("topic").map(|t| t.as_str().to_lowercase()))
    } else if caps.name("quit").is_some() {
        Command::Quit
    } else {
        Command::Name(normalized.to_lowercase())
    };

    debug!("Parsed input '{normalized}' as {command:?}");
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Command::Pick(1))]
    #[case("  12 ", Command::Pick(12))]
    #[case("0", Command::Pick(0))]
    #[case("b", Command::Back)]
    #[case("Back", Command::Back)]
    #[case("go   back", Command::Back)]
    #[case("r", Command::Restart)]
    #[case("Start Over", Command::Restart)]
    #[case("c", Command::ChangeRole)]
    #[case("change role", Command::ChangeRole)]
    #[case("?", Command::Reference(None))]
    #[case("ref", Command::Reference(None))]
    #[case("ref Tied-Up", Command::Reference(Some("tied-up".into())))]
    #[case("? grab", Command::Reference(Some("grab".into())))]
    #[case("q", Command::Quit)]
    #[case("EXIT", Command::Quit)]
    fn test_parse_command(#[case] raw: &str, #[case] expected: Command) {
        assert_eq!(parse_command(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("no-feat")]
    #[case("grappler")]
    #[case("backup")]
    #[case("two-hands")]
    fn test_parse_choice_names(#[case] raw: &str) {
        assert_eq!(parse_command(raw).unwrap(), Command::Name(raw.into()));
    }

    #[test]
    fn test_parse_name_is_lowercased() {
        assert_eq!(
            parse_command(" Pinned ").unwrap(),
            Command::Name("pinned".into())
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("pick 2")]
    #[case("-1")]
    #[case("99999999999999999999999999")]
    fn test_parse_rejects(#[case] raw: &str) {
        assert!(parse_command(raw).is_err());
    }

    #[rstest]
    #[case("\u{0662}")]
    #[case("\u{0967}\u{0968}")]
    #[case("\u{FF13}")]
    fn test_non_ascii_digits_are_unrecognised(#[case] raw: &str) {
        let err = parse_command(raw).unwrap_err().to_string();
        assert!(err.starts_with("unrecognised input"), "got: {err}");
    }
}
