//! Extraction of user identities from chat mention markup.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `@**Name**` and `@**Name|123**` mentions.
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\*\*(.*?)\*\*").unwrap());

/// Strips mention markup from a token.
///
/// Leading `@`, `*` and `<` and trailing `*` and `>` are removed, then
/// anything from the first `|` onward is dropped.
pub fn strip_mention(token: &str) -> &str {
    let raw = token
        .trim_start_matches(['@', '*', '<'])
        .trim_end_matches(['*', '>']);
    raw.split_once('|').map_or(raw, |(name, _)| name)
}

/// Finds the first `@**...**` mention in `text` and returns the bare name.
pub fn find_mention(text: &str) -> Option<&str> {
    MENTION_RE
        .find(text)
        .map(|found| strip_mention(found.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bold_mention() {
        assert_eq!(strip_mention("@**Ada Lovelace**"), "Ada Lovelace");
    }

    #[test]
    fn strips_angle_mention_with_id() {
        assert_eq!(strip_mention("<@U123|ada>"), "U123");
    }

    #[test]
    fn drops_everything_after_pipe() {
        assert_eq!(strip_mention("@**Ada|42**"), "Ada");
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(strip_mention("ada"), "ada");
    }

    #[test]
    fn finds_first_mention_in_text() {
        assert_eq!(
            find_mention("report @**Grace Hopper** 2 weeks"),
            Some("Grace Hopper")
        );
        assert_eq!(find_mention("report @**A** and @**B**"), Some("A"));
    }

    #[test]
    fn missing_mention_is_none() {
        assert_eq!(find_mention("report Grace week"), None);
    }
}
