//! Reply cleanup before JSON parsing.
//!
//! Grammar, applied per pass:
//! - reasoning block: `<tag>` ... `</tag>`, spanning from the first opening
//!   tag to the last closing tag (greedy, across lines), for each tag in the
//!   vocabulary
//! - stray reasoning tag: a lone `<tag>` or `</tag>`
//! - fence: ```` ``` ```` optionally followed by a `json` language tag
//!   (any case)
//!
//! Passes repeat until the text stops changing, then the result is trimmed.
//! Absent or unknown tags are left alone.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Reasoning tags stripped by default.
pub const DEFAULT_REASONING_TAGS: [&str; 3] = ["think", "thinking", "reasoning"];

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:[jJ][sS][oO][nN])?").unwrap());

/// Strips reasoning blocks and code fences from model replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaner {
    tags: Vec<String>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::with_tags(DEFAULT_REASONING_TAGS)
    }
}

impl Cleaner {
    /// Use a custom reasoning-tag vocabulary (tag names without brackets).
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Clean `raw` to a fixpoint.
    pub fn clean(&self, raw: &str) -> String {
        let mut current = self.pass(raw);
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut out = text.to_string();

        for tag in &self.tags {
            let open = format!("<{}>", tag);
            let close = format!("</{}>", tag);

            if let (Some(start), Some(end)) = (out.find(&open), out.rfind(&close))
                && end > start
            {
                out.replace_range(start..end + close.len(), "");
            }

            out = out.replace(&open, "").replace(&close, "");
        }

        FENCE.replace_all(&out, "").trim().to_string()
    }
}

/// Clean a reply with the default tag vocabulary.
pub fn clean_response(raw: &str) -> String {
    Cleaner::default().clean(raw)
}
