//! Parser for `[ACTION:<name>:<params>]` tags embedded in model replies.
//!
//! Pure functions only. Malformed parameter pairs are dropped silently and
//! an unknown action name is still returned; the dispatcher decides what to
//! do with it.

use std::sync::LazyLock;

use nova_types::action::{ActionParams, ParsedAction, ParsedReply};
use regex::Regex;

static ACTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ACTION:([^\]]+)\]").expect("action tag pattern is valid"));

/// Split a model reply into spoken text and at most one action.
///
/// Only the first tag is honoured and removed; any later tag stays in the
/// visible text verbatim.
pub fn parse_reply(text: &str) -> ParsedReply {
    let Some(captures) = ACTION_TAG.captures(text) else {
        return ParsedReply {
            visible_text: text.trim().to_string(),
            action: None,
        };
    };

    let action = captures.get(1).map(|content| parse_tag_content(content.as_str()));
    let visible_text = ACTION_TAG.replace(text, "").trim().to_string();

    ParsedReply {
        visible_text,
        action,
    }
}

/// Parse the inside of a tag: `<name>` or `<name>:<params>`.
pub fn parse_tag_content(content: &str) -> ParsedAction {
    let (name, raw_params) = content.split_once(':').unwrap_or((content, ""));
    ParsedAction {
        name: name.trim().to_string(),
        raw_params: raw_params.to_string(),
        params: parse_params(raw_params),
    }
}

/// Parse `key=value|key=value`. Pairs without `=`, or with an empty key or
/// value after trimming, are skipped.
pub fn parse_params(raw: &str) -> ActionParams {
    raw.split('|')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let (key, value) = (key.trim(), value.trim());
            (!key.is_empty() && !value.is_empty()).then_some((key, value))
        })
        .collect()
}

/// Read the leading integer of a string, ignoring anything after it.
///
/// `"30"`, `" 30s"` and `"+30 seconds"` all give 30; `"soon"` gives `None`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
