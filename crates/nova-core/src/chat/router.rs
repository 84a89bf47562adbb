//! Keyword routing of user text to one of the three backend request shapes.

const VISUAL_KEYWORDS: [&str; 5] = [
    "see",
    "look at",
    "what is this",
    "describe this",
    "analyze this image",
];

const SEARCH_KEYWORDS: [&str; 5] = [
    "search for",
    "look up",
    "what's the latest",
    "who won",
    "news about",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoute {
    /// Ask about a fresh camera frame.
    Visual,
    /// Web-grounded answer with sources.
    Search,
    /// Ordinary conversation, which may carry an action tag.
    Chat,
}

/// Pick a route by substring match on the lowercased text.
///
/// Visual wins over search, but only when a camera is available.
pub fn route_query(text: &str, camera_available: bool) -> QueryRoute {
    let lower = text.to_lowercase();
    if camera_available && VISUAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        QueryRoute::Visual
    } else if SEARCH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        QueryRoute::Search
    } else {
        QueryRoute::Chat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_needs_camera() {
        assert_eq!(route_query("What is this?", true), QueryRoute::Visual);
        assert_eq!(route_query("What is this?", false), QueryRoute::Chat);
    }

    #[test]
    fn test_visual_beats_search() {
        assert_eq!(route_query("Look at this and search for it", true), QueryRoute::Visual);
        assert_eq!(route_query("Look at this and search for it", false), QueryRoute::Search);
    }

    #[test]
    fn test_search_keywords() {
        assert_eq!(route_query("Who won the match last night", false), QueryRoute::Search);
        assert_eq!(route_query("NEWS ABOUT rust", true), QueryRoute::Search);
    }

    #[test]
    fn test_plain_chat() {
        assert_eq!(route_query("Remember my dog is Rex", true), QueryRoute::Chat);
    }
}
