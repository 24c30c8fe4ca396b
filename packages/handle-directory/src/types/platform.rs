use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Social platforms the directory knows about.
///
/// Declaration order is the default detection priority (see
/// [`PatternLibrary`](crate::patterns::PatternLibrary)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    TwitterX,
    Tiktok,
    Threads,
    Telegram,
    Linkedin,
    Youtube,
    Reddit,
    Discord,
    WhatsappBusiness,
}

impl Platform {
    pub const ALL: [Platform; 10] = [
        Platform::Instagram,
        Platform::TwitterX,
        Platform::Tiktok,
        Platform::Threads,
        Platform::Telegram,
        Platform::Linkedin,
        Platform::Youtube,
        Platform::Reddit,
        Platform::Discord,
        Platform::WhatsappBusiness,
    ];

    /// Stable wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TwitterX => "twitter_x",
            Platform::Tiktok => "tiktok",
            Platform::Threads => "threads",
            Platform::Telegram => "telegram",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
            Platform::Reddit => "reddit",
            Platform::Discord => "discord",
            Platform::WhatsappBusiness => "whatsapp_business",
        }
    }

    /// Lenient lookup for platform names typed by people (table columns,
    /// config lists). Accepts the wire name plus common short forms.
    pub fn from_label(label: &str) -> Option<Self> {
        let cleaned: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match cleaned.as_str() {
            "instagram" | "ig" | "insta" => Some(Platform::Instagram),
            "twitterx" | "twitter" | "x" | "tw" => Some(Platform::TwitterX),
            "tiktok" | "tt" => Some(Platform::Tiktok),
            "threads" => Some(Platform::Threads),
            "telegram" | "tg" => Some(Platform::Telegram),
            "linkedin" | "li" => Some(Platform::Linkedin),
            "youtube" | "yt" => Some(Platform::Youtube),
            "reddit" => Some(Platform::Reddit),
            "discord" => Some(Platform::Discord),
            "whatsappbusiness" | "whatsapp" | "wa" => Some(Platform::WhatsappBusiness),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = StoreError;

    /// Strict parse of the wire name, used when decoding stored rows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown platform: {}", s)))
    }
}

/// Coarse trust label for a platform detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Platform::TwitterX).unwrap();
        assert_eq!(json, "\"twitter_x\"");
        let parsed: Platform = serde_json::from_str("\"whatsapp_business\"").unwrap();
        assert_eq!(parsed, Platform::WhatsappBusiness);
    }

    #[test]
    fn labels_accept_short_forms() {
        assert_eq!(Platform::from_label("IG"), Some(Platform::Instagram));
        assert_eq!(Platform::from_label("Twitter/X"), Some(Platform::TwitterX));
        assert_eq!(Platform::from_label(" x "), Some(Platform::TwitterX));
        assert_eq!(Platform::from_label("WhatsApp Business"), Some(Platform::WhatsappBusiness));
        assert_eq!(Platform::from_label("myspace"), None);
    }

    #[test]
    fn unknown_wire_name_is_corrupt() {
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(StoreError::Corrupt(_))
        ));
    }
}
