//! Visibility rules deciding which sections and items reach each output channel.
//!
//! Every renderer goes through `visible_section` so a section and its items are
//! filtered the same way everywhere.

use serde::Deserialize;

/// The `hidden` marker on a section or item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Option<String>")]
pub enum Visibility {
    /// Absent, `null`, `""` or `"none"`.
    #[default]
    Visible,
    /// `"all"`: shown nowhere.
    HiddenAll,
    /// `"resume"`: hidden from the PDF only.
    HiddenFromResume,
    /// `"site"`: recognised but not wired to any channel yet.
    SiteMarked,
}

/// A rendering target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Site,
    Resume,
}

impl TryFrom<Option<String>> for Visibility {
    type Error = String;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        match value.as_deref() {
            None | Some("") | Some("none") => Ok(Visibility::Visible),
            Some("all") => Ok(Visibility::HiddenAll),
            Some("resume") => Ok(Visibility::HiddenFromResume),
            Some("site") => Ok(Visibility::SiteMarked),
            Some(other) => Err(format!(
                "unknown visibility marker '{other}' (expected none, all, resume or site)"
            )),
        }
    }
}

/// Anything carrying an item-level `hidden` marker.
pub trait Hideable {
    fn visibility(&self) -> Visibility;
}

/// Whether an element with this marker is shown on `channel`.
pub fn is_shown(hidden: Visibility, channel: Channel) -> bool {
    match (hidden, channel) {
        (Visibility::HiddenAll, _) => false,
        (Visibility::HiddenFromResume, Channel::Resume) => false,
        _ => true,
    }
}

/// Items of a section that survive the filter for `channel`.
///
/// Returns `None` when the section itself is hidden or when no item is left,
/// so callers never render an empty heading.
pub fn visible_section<T: Hideable>(
    section_hidden: Visibility,
    items: &[T],
    channel: Channel,
) -> Option<Vec<&T>> {
    if !is_shown(section_hidden, channel) {
        return None;
    }
    let visible: Vec<&T> = items
        .iter()
        .filter(|item| is_shown(item.visibility(), channel))
        .collect();
    if visible.is_empty() {
        None
    } else {
        Some(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(Visibility);

    impl Hideable for Item {
        fn visibility(&self) -> Visibility {
            self.0
        }
    }

    #[test]
    fn test_visible_marker_shown_on_both_channels() {
        assert!(is_shown(Visibility::Visible, Channel::Site));
        assert!(is_shown(Visibility::Visible, Channel::Resume));
    }

    #[test]
    fn test_all_marker_hidden_everywhere() {
        assert!(!is_shown(Visibility::HiddenAll, Channel::Site));
        assert!(!is_shown(Visibility::HiddenAll, Channel::Resume));
    }

    #[test]
    fn test_resume_marker_hidden_only_from_resume() {
        assert!(!is_shown(Visibility::HiddenFromResume, Channel::Resume));
        assert!(is_shown(Visibility::HiddenFromResume, Channel::Site));
    }

    #[test]
    fn test_site_marker_has_no_effect() {
        assert!(is_shown(Visibility::SiteMarked, Channel::Site));
        assert!(is_shown(Visibility::SiteMarked, Channel::Resume));
    }

    #[test]
    fn test_marker_parsing() {
        let parse = |v: Option<&str>| Visibility::try_from(v.map(str::to_string));
        assert_eq!(parse(None), Ok(Visibility::Visible));
        assert_eq!(parse(Some("")), Ok(Visibility::Visible));
        assert_eq!(parse(Some("none")), Ok(Visibility::Visible));
        assert_eq!(parse(Some("all")), Ok(Visibility::HiddenAll));
        assert_eq!(parse(Some("resume")), Ok(Visibility::HiddenFromResume));
        assert_eq!(parse(Some("site")), Ok(Visibility::SiteMarked));
        assert!(parse(Some("sometimes")).is_err());
    }

    #[test]
    fn test_marker_deserializes_from_json() {
        let parsed: Visibility = serde_json::from_str("\"resume\"").unwrap();
        assert_eq!(parsed, Visibility::HiddenFromResume);
        let null: Visibility = serde_json::from_str("null").unwrap();
        assert_eq!(null, Visibility::Visible);
    }

    #[test]
    fn test_marker_matching_is_exact() {
        let parse = |v: &str| Visibility::try_from(Some(v.to_string()));
        assert!(parse(" all ").is_err());
        assert!(parse("Resume").is_err());
        assert!(parse("site\n").is_err());
        assert!(serde_json::from_str::<Visibility>("\" resume\"").is_err());
    }

    #[test]
    fn test_hidden_section_suppresses_visible_items() {
        let items = vec![Item(Visibility::Visible), Item(Visibility::Visible)];
        assert!(visible_section(Visibility::HiddenFromResume, &items, Channel::Resume).is_none());
        assert_eq!(
            visible_section(Visibility::HiddenFromResume, &items, Channel::Site)
                .map(|v| v.len()),
            Some(2)
        );
    }

    #[test]
    fn test_section_with_no_surviving_items_is_suppressed() {
        let items = vec![Item(Visibility::HiddenAll), Item(Visibility::HiddenFromResume)];
        assert!(
            visible_section(Visibility::Visible, &items, Channel::Resume).is_none(),
            "empty result must suppress the heading"
        );
        let site = visible_section(Visibility::Visible, &items, Channel::Site).unwrap();
        assert_eq!(site.len(), 1);
    }

    #[test]
    fn test_empty_section_is_suppressed() {
        let items: Vec<Item> = Vec::new();
        assert!(visible_section(Visibility::Visible, &items, Channel::Site).is_none());
    }
}
