//! Per-platform handle normalization and validation.
//!
//! These rules define the stored form of every handle, so they must stay
//! byte-for-byte stable: changing one splits existing rows from new
//! submissions of the same account.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{DirectoryError, Result};
use crate::types::Platform;

lazy_static! {
    // instagram / tiktok / threads
    static ref DOTTED_HANDLE: Regex = Regex::new(r"^[A-Za-z0-9._]{1,30}$").unwrap();

    static ref TWITTER_HANDLE: Regex = Regex::new(r"^[A-Za-z0-9_]{1,15}$").unwrap();

    static ref LINKEDIN_SLUG: Regex = Regex::new(r"^[A-Za-z0-9-]{3,100}$").unwrap();

    static ref REDDIT_USER: Regex = Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap();

    static ref TELEGRAM_USER: Regex = Regex::new(r"^[A-Za-z0-9_]{5,32}$").unwrap();

    // name#1234
    static ref DISCORD_TAG: Regex = Regex::new(r"^[A-Za-z0-9._]{2,32}#[0-9]{4}$").unwrap();

    static ref WHATSAPP_NUMBER: Regex = Regex::new(r"^[0-9]{8,15}$").unwrap();
}

/// Convert a raw handle into the platform's stored form.
///
/// Never fails; pair with [`validate_handle`] before persisting.
pub fn normalize_handle(platform: Platform, raw: &str) -> String {
    let raw = raw.trim();
    match platform {
        Platform::Instagram
        | Platform::Tiktok
        | Platform::Threads
        | Platform::TwitterX
        | Platform::Telegram => raw.strip_prefix('@').unwrap_or(raw).to_lowercase(),
        Platform::Linkedin => raw.to_lowercase(),
        Platform::Youtube | Platform::Discord => raw.to_string(),
        Platform::Reddit => {
            let lowered = raw.to_lowercase();
            match lowered.strip_prefix("u/") {
                Some(rest) => rest.to_string(),
                None => lowered,
            }
        }
        Platform::WhatsappBusiness => raw.chars().filter(|c| c.is_ascii_digit()).collect(),
    }
}

/// Check an already-normalized handle against the platform's pattern.
pub fn is_valid_handle(platform: Platform, handle: &str) -> bool {
    match platform {
        Platform::Instagram | Platform::Tiktok | Platform::Threads => DOTTED_HANDLE.is_match(handle),
        Platform::TwitterX => TWITTER_HANDLE.is_match(handle),
        Platform::Linkedin => LINKEDIN_SLUG.is_match(handle),
        Platform::Youtube => (3..=100).contains(&handle.chars().count()),
        Platform::Reddit => REDDIT_USER.is_match(handle),
        Platform::Telegram => TELEGRAM_USER.is_match(handle),
        Platform::Discord => DISCORD_TAG.is_match(handle),
        Platform::WhatsappBusiness => WHATSAPP_NUMBER.is_match(handle),
    }
}

/// Normalize then validate, returning the stored form.
pub fn validate_handle(platform: Platform, raw: &str) -> Result<String> {
    let handle = normalize_handle(platform, raw);
    if is_valid_handle(platform, &handle) {
        Ok(handle)
    } else {
        Err(DirectoryError::InvalidHandleFormat {
            platform,
            handle: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_platforms_strip_and_lowercase() {
        for platform in [
            Platform::Instagram,
            Platform::Tiktok,
            Platform::Threads,
            Platform::TwitterX,
        ] {
            assert_eq!(normalize_handle(platform, "@Nike"), "nike");
            assert_eq!(normalize_handle(platform, "NIKE"), "nike");
        }
        assert_eq!(normalize_handle(Platform::Telegram, "@Durov_Channel"), "durov_channel");
    }

    #[test]
    fn case_preserving_platforms() {
        assert_eq!(normalize_handle(Platform::Youtube, "@MrBeast"), "@MrBeast");
        assert_eq!(normalize_handle(Platform::Discord, "Gamer#0420"), "Gamer#0420");
        assert_eq!(normalize_handle(Platform::Linkedin, "Acme-Corp"), "acme-corp");
    }

    #[test]
    fn reddit_strips_user_prefix() {
        assert_eq!(normalize_handle(Platform::Reddit, "u/Spez"), "spez");
        assert_eq!(normalize_handle(Platform::Reddit, "U/spez"), "spez");
        assert_eq!(normalize_handle(Platform::Reddit, "spez"), "spez");
    }

    #[test]
    fn whatsapp_keeps_digits_only() {
        assert_eq!(
            normalize_handle(Platform::WhatsappBusiness, "+1 (555) 010-0200"),
            "15550100200"
        );
    }

    #[test]
    fn length_bounds() {
        assert!(validate_handle(Platform::TwitterX, "a").is_ok());
        assert!(validate_handle(Platform::TwitterX, "abcdefghijklmno").is_ok());
        assert!(validate_handle(Platform::TwitterX, "abcdefghijklmnop").is_err());
        assert!(validate_handle(Platform::TwitterX, "nike.store").is_err());
        assert!(validate_handle(Platform::Instagram, "nike.store").is_ok());
        assert!(validate_handle(Platform::Telegram, "abcd").is_err());
        assert!(validate_handle(Platform::Telegram, "abcde").is_ok());
        assert!(validate_handle(Platform::Linkedin, "ab").is_err());
        assert!(validate_handle(Platform::Reddit, &"a".repeat(21)).is_err());
        assert!(validate_handle(Platform::Youtube, "ab").is_err());
        assert!(validate_handle(Platform::Youtube, "Any Channel Name!").is_ok());
    }

    #[test]
    fn discord_requires_discriminator() {
        assert!(validate_handle(Platform::Discord, "gamer#0420").is_ok());
        assert!(validate_handle(Platform::Discord, "gamer").is_err());
        assert!(validate_handle(Platform::Discord, "g#0420").is_err());
    }

    #[test]
    fn whatsapp_digit_bounds() {
        assert!(validate_handle(Platform::WhatsappBusiness, "1234567").is_err());
        assert!(validate_handle(Platform::WhatsappBusiness, "12345678").is_ok());
        assert!(validate_handle(Platform::WhatsappBusiness, "1234567890123456").is_err());
    }

    #[test]
    fn invalid_handle_reports_raw_input() {
        match validate_handle(Platform::TwitterX, "@not valid") {
            Err(DirectoryError::InvalidHandleFormat { platform, handle }) => {
                assert_eq!(platform, Platform::TwitterX);
                assert_eq!(handle, "@not valid");
            }
            other => panic!("expected InvalidHandleFormat, got {:?}", other),
        }
    }
}
