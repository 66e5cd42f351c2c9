//! Shared author and command policy.
//!
//! Bot detection and slash-command detection are consulted by the content
//! filter, the grouping engine and word counting. All three read the same
//! [`AuthorPolicy`] so the rules cannot drift apart.

use serde::{Deserialize, Serialize};

/// Rules for recognising machine accounts and slash commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorPolicy {
    /// Author-name suffixes marking a machine account (e.g. `[bot]`).
    #[serde(default = "default_bot_suffixes")]
    pub bot_suffixes: Vec<String>,

    /// Substrings that mark an author as a bot wherever they appear.
    #[serde(default = "default_bot_substrings")]
    pub bot_substrings: Vec<String>,

    /// Prefixes that turn a comment body into a command.
    #[serde(default = "default_command_prefixes")]
    pub command_prefixes: Vec<String>,
}

impl Default for AuthorPolicy {
    fn default() -> Self {
        Self {
            bot_suffixes: default_bot_suffixes(),
            bot_substrings: default_bot_substrings(),
            command_prefixes: default_command_prefixes(),
        }
    }
}

fn default_bot_suffixes() -> Vec<String> {
    vec!["[bot]".to_string(), "-bot".to_string()]
}

fn default_bot_substrings() -> Vec<String> {
    vec![
        "dependabot".to_string(),
        "renovate".to_string(),
        "github-actions".to_string(),
        "codecov".to_string(),
    ]
}

fn default_command_prefixes() -> Vec<String> {
    vec!["/".to_string()]
}

impl AuthorPolicy {
    /// A policy that recognises nothing. Useful as a base in tests.
    pub fn permissive() -> Self {
        Self {
            bot_suffixes: Vec::new(),
            bot_substrings: Vec::new(),
            command_prefixes: Vec::new(),
        }
    }

    /// Whether `author` is a machine account.
    ///
    /// Platform metadata (`author_type == "Bot"`) is an extra positive
    /// signal; a name match alone is sufficient.
    pub fn is_bot(&self, author: &str, author_type: Option<&str>) -> bool {
        if author_type.is_some_and(|kind| kind.eq_ignore_ascii_case("bot")) {
            return true;
        }

        let name = author.to_lowercase();
        self.bot_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && name.ends_with(&suffix.to_lowercase()))
            || self
                .bot_substrings
                .iter()
                .any(|needle| !needle.is_empty() && name.contains(&needle.to_lowercase()))
    }

    /// Whether `body` is a slash command once leading whitespace is dropped.
    pub fn is_command(&self, body: &str) -> bool {
        let trimmed = body.trim_start();
        self.command_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && trimmed.starts_with(prefix.as_str()))
    }

    /// Comments that never take part in grouping and always count zero words.
    pub fn is_excluded_from_scoring(
        &self,
        author: &str,
        author_type: Option<&str>,
        body: &str,
    ) -> bool {
        self.is_bot(author, author_type) || self.is_command(body)
    }
}
