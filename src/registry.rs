//! Static routing table from tool names to backend base URLs.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// The closed set of tool backends the gateway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Filesystem,
    Github,
    Atlassian,
    Gdrive,
}

impl Tool {
    /// Registry iteration order.
    pub const ALL: [Tool; 4] = [Tool::Filesystem, Tool::Github, Tool::Atlassian, Tool::Gdrive];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Filesystem => "filesystem",
            Tool::Github => "github",
            Tool::Atlassian => "atlassian",
            Tool::Gdrive => "gdrive",
        }
    }

    /// Environment variable overriding this tool's base URL.
    pub fn env_var(self) -> &'static str {
        match self {
            Tool::Filesystem => "FILESYSTEM_MCP_URL",
            Tool::Github => "GITHUB_MCP_URL",
            Tool::Atlassian => "ATLASSIAN_MCP_URL",
            Tool::Gdrive => "GDRIVE_MCP_URL",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Tool::Filesystem => 8001,
            Tool::Github => 8002,
            Tool::Atlassian => 8003,
            Tool::Gdrive => 8004,
        }
    }

    pub fn default_url(self) -> String {
        format!("http://localhost:{}", self.default_port())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool '{}'", self.0)
    }
}

impl std::error::Error for UnknownTool {}

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// One registered backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub tool: Tool,
    pub base_url: String,
}

/// Immutable mapping holding exactly one target per [`Tool`], in [`Tool::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    /// Build from the `*_MCP_URL` environment variables, falling back to localhost defaults.
    pub fn from_env() -> Self {
        Self::with_urls(
            Tool::ALL
                .into_iter()
                .filter_map(|tool| env::var(tool.env_var()).ok().map(|url| (tool, url))),
        )
    }

    /// Build with explicit overrides. Tools not listed keep their default URL.
    pub fn with_urls<I, S>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (Tool, S)>,
        S: Into<String>,
    {
        let mut targets: Vec<Target> = Tool::ALL
            .into_iter()
            .map(|tool| Target {
                tool,
                base_url: tool.default_url(),
            })
            .collect();

        for (tool, url) in overrides {
            let url: String = url.into();
            targets[tool as usize].base_url = url.trim_end_matches('/').to_string();
        }

        Self { targets }
    }

    /// Look up a target by its wire name.
    pub fn get(&self, name: &str) -> Option<&Target> {
        name.parse::<Tool>()
            .ok()
            .map(|tool| &self.targets[tool as usize])
    }

    pub fn base_url(&self, tool: Tool) -> &str {
        &self.targets[tool as usize].base_url
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::with_urls(std::iter::empty::<(Tool, String)>())
    }
}
