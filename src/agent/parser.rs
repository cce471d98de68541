//! Positional command parser: `<tool> <action> key=value ...`.

use crate::registry::Tool;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tool used when the first token does not name a known backend.
pub const DEFAULT_TOOL: Tool = Tool::Filesystem;

/// Action used when the query has fewer than two tokens.
pub const DEFAULT_ACTION: &str = "get_methods";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    pub tool: Tool,
    pub action: String,
    pub args: BTreeMap<String, String>,
}

/// Parse a whitespace-delimited command. Never fails; malformed input degrades
/// to the default tool and action with whatever arguments could be read.
///
/// Token 0 selects the tool and token 1 the action, positionally. Remaining
/// tokens split on their first `=`; a missing value becomes `""` and a token
/// with an empty key is dropped. Later duplicates overwrite earlier ones.
pub fn parse(raw: &str) -> ParsedQuery {
    let mut tokens = raw.split_whitespace();

    let tool = tokens
        .next()
        .and_then(|t| t.parse::<Tool>().ok())
        .unwrap_or(DEFAULT_TOOL);

    let action = tokens.next().unwrap_or(DEFAULT_ACTION).to_string();

    let args = tokens
        .filter_map(|token| {
            let (key, value) = token.split_once('=').unwrap_or((token, ""));
            (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect();

    ParsedQuery { tool, action, args }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_command() {
        let parsed = parse("filesystem list_files path=./src");
        assert_eq!(parsed.tool, Tool::Filesystem);
        assert_eq!(parsed.action, "list_files");
        assert_eq!(
            parsed.args,
            BTreeMap::from([("path".to_string(), "./src".to_string())])
        );
    }

    #[test]
    fn test_empty_input_defaults() {
        let parsed = parse("");
        assert_eq!(parsed.tool, Tool::Filesystem);
        assert_eq!(parsed.action, "get_methods");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_tool_only_defaults_action() {
        let parsed = parse("  github  ");
        assert_eq!(parsed.tool, Tool::Github);
        assert_eq!(parsed.action, "get_methods");
    }

    #[test]
    fn test_unknown_tool_falls_back_but_stays_positional() {
        let parsed = parse("jira search_issues project=NEX");
        assert_eq!(parsed.tool, Tool::Filesystem);
        assert_eq!(parsed.action, "search_issues");
        assert_eq!(parsed.args["project"], "NEX");
    }

    #[test]
    fn test_value_split_on_first_equals() {
        let parsed = parse("atlassian search_issues jql=status=open");
        assert_eq!(parsed.args["jql"], "status=open");
    }

    #[test]
    fn test_missing_value_and_missing_key() {
        let parsed = parse("gdrive list_files recursive =orphan shared=");
        assert_eq!(parsed.args.len(), 2);
        assert_eq!(parsed.args["recursive"], "");
        assert_eq!(parsed.args["shared"], "");
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let parsed = parse("filesystem read_file path=a path=b");
        assert_eq!(parsed.args["path"], "b");
    }
}
