//! Platform pattern library.
//!
//! Every platform owns an ordered list of recognizers (URL shapes, `@handle`
//! shapes, phone shapes). Detection walks platforms in priority order and,
//! within a platform, recognizers in declaration order; the first hit wins.
//!
//! # Ambiguity policy
//!
//! A bare `@name` is accepted by Instagram, Twitter/X, TikTok, Threads and
//! Telegram alike. The platform listed first in the priority order claims it,
//! at that platform's confidence tier, even though the true platform cannot be
//! known from the text. Callers that care supply URLs or explicit platform
//! columns, or reorder the priority list via
//! [`DirectoryConfig::platform_priority`](crate::types::DirectoryConfig).

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::types::{Confidence, Platform};

/// Maps a successful match to a bare handle; `None` rejects the match.
pub type Extractor = fn(&Captures<'_>) -> Option<String>;

/// One pattern for one platform.
#[derive(Clone)]
pub struct Recognizer {
    pattern: Regex,
    extract: Extractor,
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

impl Recognizer {
    pub fn new(pattern: Regex, extract: Extractor) -> Self {
        Self { pattern, extract }
    }

    /// Recognizer whose first capture group is the handle.
    pub fn capture(pattern: Regex) -> Self {
        Self::new(pattern, first_group)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.recognize(text).is_some()
    }

    pub fn recognize(&self, text: &str) -> Option<String> {
        let captures = self.pattern.captures(text)?;
        (self.extract)(&captures)
    }
}

/// All recognizers for a platform, sharing one confidence tier.
#[derive(Debug, Clone)]
pub struct PlatformPatterns {
    pub platform: Platform,
    pub confidence: Confidence,
    pub recognizers: Vec<Recognizer>,
}

impl PlatformPatterns {
    pub fn recognize(&self, text: &str) -> Option<String> {
        self.recognizers.iter().find_map(|r| r.recognize(text))
    }
}

/// Result of a successful detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub platform: Platform,
    pub confidence: Confidence,
    /// Bare handle as it appeared in the text (case preserved).
    pub handle: String,
}

/// Immutable, shareable set of platform recognizers in priority order.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    platforms: Arc<Vec<PlatformPatterns>>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self {
            platforms: DEFAULT_PATTERNS.clone(),
        }
    }
}

impl PatternLibrary {
    /// Build from an explicit table (tests, alternate deployments).
    pub fn new(platforms: Vec<PlatformPatterns>) -> Self {
        Self {
            platforms: Arc::new(platforms),
        }
    }

    /// Default recognizers reordered by `priority`.
    pub fn with_priority(priority: &[Platform]) -> Self {
        Self::default().reordered(priority)
    }

    /// Reorder platforms: listed ones first (in list order), the rest after in
    /// their current order. Duplicates and unknown entries are ignored.
    pub fn reordered(&self, priority: &[Platform]) -> Self {
        let mut ordered: Vec<PlatformPatterns> = Vec::with_capacity(self.platforms.len());
        for platform in priority {
            if ordered.iter().any(|p| p.platform == *platform) {
                continue;
            }
            if let Some(patterns) = self.platforms.iter().find(|p| p.platform == *platform) {
                ordered.push(patterns.clone());
            }
        }
        for patterns in self.platforms.iter() {
            if !ordered.iter().any(|p| p.platform == patterns.platform) {
                ordered.push(patterns.clone());
            }
        }
        Self::new(ordered)
    }

    /// Current priority order.
    pub fn priority(&self) -> Vec<Platform> {
        self.platforms.iter().map(|p| p.platform).collect()
    }

    /// First platform (in priority order) whose recognizers accept `text`.
    pub fn detect(&self, text: &str) -> Option<Detection> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.platforms.iter().find_map(|p| {
            p.recognize(text).map(|handle| Detection {
                platform: p.platform,
                confidence: p.confidence,
                handle,
            })
        })
    }

    /// Run only `platform`'s recognizers.
    pub fn detect_for(&self, platform: Platform, text: &str) -> Option<Detection> {
        let text = text.trim();
        let patterns = self.platforms.iter().find(|p| p.platform == platform)?;
        patterns.recognize(text).map(|handle| Detection {
            platform,
            confidence: patterns.confidence,
            handle,
        })
    }

    /// Confidence tier for a platform.
    pub fn confidence_of(&self, platform: Platform) -> Confidence {
        self.platforms
            .iter()
            .find(|p| p.platform == platform)
            .map(|p| p.confidence)
            .unwrap_or(Confidence::Low)
    }
}

// ============================================================================
// Default table
// ============================================================================

fn first_group(captures: &Captures<'_>) -> Option<String> {
    captures.get(1).map(|m| m.as_str().to_string())
}

/// YouTube paths that look like channel names but aren't.
const YOUTUBE_RESERVED: &[&str] = &["watch", "shorts", "playlist", "results", "feed", "embed"];

fn youtube_channel(captures: &Captures<'_>) -> Option<String> {
    let name = captures.get(1)?.as_str();
    if YOUTUBE_RESERVED.contains(&name.to_lowercase().as_str()) {
        return None;
    }
    Some(name.to_string())
}

fn phone_digits(captures: &Captures<'_>) -> Option<String> {
    let digits: String = captures
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    (8..=15).contains(&digits.len()).then_some(digits)
}

fn re(pattern: &str) -> Regex {
    // Patterns below are compile-time constants covered by tests.
    Regex::new(pattern).unwrap()
}

fn default_patterns() -> Vec<PlatformPatterns> {
    const URL_TAIL: &str = r"/?(?:[?#].*)?$";

    vec![
        PlatformPatterns {
            platform: Platform::Instagram,
            confidence: Confidence::High,
            recognizers: vec![
                Recognizer::capture(re(&format!(
                    r"(?i)^(?:https?://)?(?:www\.|m\.)?instagram\.com/([A-Za-z0-9._]{{1,30}}){}",
                    URL_TAIL
                ))),
                Recognizer::capture(re(r"^@([A-Za-z0-9._]{1,30})$")),
            ],
        },
        PlatformPatterns {
            platform: Platform::TwitterX,
            confidence: Confidence::High,
            recognizers: vec![
                Recognizer::capture(re(&format!(
                    r"(?i)^(?:https?://)?(?:www\.|mobile\.)?(?:twitter|x)\.com/([A-Za-z0-9_]{{1,15}}){}",
                    URL_TAIL
                ))),
                Recognizer::capture(re(r"^@([A-Za-z0-9_]{1,15})$")),
            ],
        },
        PlatformPatterns {
            platform: Platform::Tiktok,
            confidence: Confidence::High,
            recognizers: vec![
                Recognizer::capture(re(&format!(
                    r"(?i)^(?:https?://)?(?:www\.|m\.)?tiktok\.com/@([A-Za-z0-9._]{{1,30}}){}",
                    URL_TAIL
                ))),
                Recognizer::capture(re(r"^@([A-Za-z0-9._]{1,30})$")),
            ],
        },
        PlatformPatterns {
            platform: Platform::Threads,
            confidence: Confidence::High,
            recognizers: vec![
                Recognizer::capture(re(&format!(
                    r"(?i)^(?:https?://)?(?:www\.)?threads\.(?:net|com)/@([A-Za-z0-9._]{{1,30}}){}",
                    URL_TAIL
                ))),
                Recognizer::capture(re(r"^@([A-Za-z0-9._]{1,30})$")),
            ],
        },
        PlatformPatterns {
            platform: Platform::Telegram,
            confidence: Confidence::High,
            recognizers: vec![
                Recognizer::capture(re(&format!(
                    r"(?i)^(?:https?://)?(?:t|telegram)\.me/([A-Za-z0-9_]{{5,32}}){}",
                    URL_TAIL
                ))),
                Recognizer::capture(re(r"^@([A-Za-z0-9_]{5,32})$")),
            ],
        },
        PlatformPatterns {
            platform: Platform::Linkedin,
            confidence: Confidence::High,
            recognizers: vec![Recognizer::capture(re(&format!(
                r"(?i)^(?:https?://)?(?:[a-z]{{2,3}}\.)?linkedin\.com/(?:in|company|school)/([A-Za-z0-9-]{{3,100}}){}",
                URL_TAIL
            )))],
        },
        PlatformPatterns {
            platform: Platform::Youtube,
            confidence: Confidence::High,
            recognizers: vec![Recognizer::new(
                re(&format!(
                    r"(?i)^(?:https?://)?(?:www\.|m\.)?youtube\.com/(?:@|c/|user/|channel/)?([A-Za-z0-9._-]{{3,100}}){}",
                    URL_TAIL
                )),
                youtube_channel,
            )],
        },
        PlatformPatterns {
            platform: Platform::Reddit,
            confidence: Confidence::High,
            recognizers: vec![
                Recognizer::capture(re(&format!(
                    r"(?i)^(?:https?://)?(?:www\.|old\.|new\.)?reddit\.com/(?:u|user)/([A-Za-z0-9_-]{{3,20}}){}",
                    URL_TAIL
                ))),
                Recognizer::capture(re(r"(?i)^/?u/([A-Za-z0-9_-]{3,20})$")),
            ],
        },
        PlatformPatterns {
            platform: Platform::Discord,
            // name#1234 can't be checked for server-wide uniqueness from text
            confidence: Confidence::Low,
            recognizers: vec![Recognizer::capture(re(r"^([A-Za-z0-9._]{2,32}#[0-9]{4})$"))],
        },
        PlatformPatterns {
            platform: Platform::WhatsappBusiness,
            confidence: Confidence::Medium,
            recognizers: vec![
                Recognizer::new(
                    re(&format!(
                        r"(?i)^(?:https?://)?(?:api\.)?wa\.me/(\+?[0-9]{{8,15}}){}",
                        URL_TAIL
                    )),
                    phone_digits,
                ),
                Recognizer::new(re(r"^(\+?[0-9][0-9 ().-]{6,22}[0-9])$"), phone_digits),
            ],
        },
    ]
}

lazy_static! {
    static ref DEFAULT_PATTERNS: Arc<Vec<PlatformPatterns>> = Arc::new(default_patterns());
}
