//! Prose word counting.
//!
//! Only the author's own prose counts toward a score. Quoted replies, code
//! and links are removed before the text is split on whitespace.

use crate::policy::AuthorPolicy;
use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BACKTICKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?(?:```|\z)").expect("valid fenced code regex"));

static FENCED_TILDES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)~~~.*?(?:~~~|\z)").expect("valid fenced code regex"));

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`\n]*`").expect("valid inline code regex"));

static BLOCK_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*>.*$").expect("valid block quote regex"));

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?|ftp)://\S+").expect("valid url regex"));

/// Remove fenced code, inline code, block quotes and bare URLs.
pub fn strip_non_prose(text: &str) -> String {
    let text = FENCED_BACKTICKS.replace_all(text, " ");
    let text = FENCED_TILDES.replace_all(&text, " ");
    let text = INLINE_CODE.replace_all(&text, " ");
    let text = BLOCK_QUOTE.replace_all(&text, " ");
    BARE_URL.replace_all(&text, " ").into_owned()
}

/// Count prose words.
///
/// Returns 0 for bot comments and slash commands whatever the body holds.
pub fn count_words(text: &str, is_bot: bool, is_slash_command: bool) -> usize {
    if is_bot || is_slash_command {
        return 0;
    }
    strip_non_prose(text).split_whitespace().count()
}

/// Count words for a comment, deriving the bot/command flags from `policy`.
pub fn count_comment_words(
    body: &str,
    author: &str,
    author_type: Option<&str>,
    policy: &AuthorPolicy,
) -> usize {
    count_words(
        body,
        policy.is_bot(author, author_type),
        policy.is_command(body),
    )
}
