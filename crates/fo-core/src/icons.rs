//! Icon suggestions for questions and fields, keyed by a category guessed
//! from the label. Icon names are Bootstrap Icons identifiers (`bi-<name>`).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Person,
    Email,
    Phone,
    Address,
    Date,
    Security,
    General,
}

impl IconCategory {
    pub const ALL: [IconCategory; 7] = [
        IconCategory::Person,
        IconCategory::Email,
        IconCategory::Phone,
        IconCategory::Address,
        IconCategory::Date,
        IconCategory::Security,
        IconCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IconCategory::Person => "person",
            IconCategory::Email => "email",
            IconCategory::Phone => "phone",
            IconCategory::Address => "address",
            IconCategory::Date => "date",
            IconCategory::Security => "security",
            IconCategory::General => "general",
        }
    }

    pub fn icons(self) -> &'static [&'static str] {
        match self {
            IconCategory::Person => &[
                "person",
                "person-fill",
                "person-circle",
                "person-vcard",
                "person-badge",
                "person-rolodex",
                "person-lines-fill",
            ],
            IconCategory::Email => &["envelope", "envelope-fill", "envelope-open", "inbox", "send", "at"],
            IconCategory::Phone => &[
                "telephone",
                "telephone-fill",
                "telephone-forward",
                "phone",
                "phone-vibrate",
            ],
            IconCategory::Address => &["geo-alt", "geo-alt-fill", "map", "map-fill", "house", "building"],
            IconCategory::Date => &["calendar", "calendar-date", "calendar-event", "calendar-week"],
            IconCategory::Security => &["lock", "lock-fill", "shield-lock", "shield-check", "key"],
            IconCategory::General => &["file-earmark-text", "clipboard", "chat-dots", "star"],
        }
    }

    /// Guess a category from keywords in a label. First match wins, in the
    /// order person, email, phone, address, date, security.
    pub fn guess(label: &str) -> Self {
        const KEYWORDS: [(IconCategory, &[&str]); 6] = [
            (IconCategory::Person, &["name", "user"]),
            (IconCategory::Email, &["email"]),
            (IconCategory::Phone, &["phone", "tel"]),
            (IconCategory::Address, &["address"]),
            (IconCategory::Date, &["date", "dob"]),
            (IconCategory::Security, &["password", "security"]),
        ];
        let label = label.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| label.contains(w)))
            .map_or(IconCategory::General, |(category, _)| *category)
    }
}

/// Suggested icons for a label: its guessed category and that category's icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconSuggestion {
    pub category: IconCategory,
    pub icons: &'static [&'static str],
}

#[must_use]
pub fn suggest_icons(label: &str) -> IconSuggestion {
    let category = IconCategory::guess(label);
    IconSuggestion {
        category,
        icons: category.icons(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_follow_keyword_order() {
        assert_eq!(IconCategory::guess("Full Name"), IconCategory::Person);
        assert_eq!(IconCategory::guess("Username or Email"), IconCategory::Person);
        assert_eq!(IconCategory::guess("EMAIL"), IconCategory::Email);
        assert_eq!(IconCategory::guess("Mobile phone"), IconCategory::Phone);
        assert_eq!(IconCategory::guess("Street address"), IconCategory::Address);
        assert_eq!(IconCategory::guess("DOB"), IconCategory::Date);
        assert_eq!(IconCategory::guess("Password"), IconCategory::Security);
        assert_eq!(IconCategory::guess("Comments"), IconCategory::General);
        assert_eq!(IconCategory::guess(""), IconCategory::General);
    }

    #[test]
    fn every_category_offers_icons() {
        for category in IconCategory::ALL {
            assert!(!category.icons().is_empty(), "{category:?}");
        }
        assert_eq!(suggest_icons("Email").icons[0], "envelope");
    }
}
