//! Deterministic local responder used when the upstream service is
//! unavailable or returns nothing usable.
//!
//! Input is lowercased and trimmed, then matched against keyword classes in
//! priority order (greeting, time, date, joke, weather, help). Matching is by
//! substring, so "this" counts as containing "hi". Anything else gets a
//! generic reply. The responder never returns an empty string.

use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

const GREETING_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];
const TIME_KEYWORDS: &[&str] = &["time", "clock"];
const DATE_KEYWORDS: &[&str] = &["date", "today", "day"];
const JOKE_KEYWORDS: &[&str] = &["joke", "funny"];
const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature"];
const HELP_KEYWORDS: &[&str] = &["help", "what can you do"];

pub const NOT_UNDERSTOOD_REPLY: &str = "I didn't understand that. Please try again.";

pub const GREETING_REPLY: &str = "Hello there! I'm your voice assistant, and I'm excited to help you today. Feel free to ask me questions, have a conversation, or just chat about anything that interests you. What would you like to talk about?";

pub const WEATHER_REPLY: &str =
    "I don't have access to weather information, but you can check your local weather app!";

pub const HELP_REPLY: &str = "I can chat with you about various topics, tell you the current time and date, share some jokes to brighten your day, and engage in interesting conversations. While I'm currently running in offline mode, I'm still here to be your friendly companion. What would you like to talk about today?";

pub const GENERIC_REPLY: &str = "That's an interesting topic! I'd love to help you explore that further. While I'm currently running in offline mode, I can still chat with you about various topics. Feel free to ask me about the time, date, or request a joke to lighten the mood. What else would you like to discuss?";

/// Fixed joke set; one is drawn uniformly per joke request.
pub const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything! But seriously, atoms are fascinating - they're the building blocks of everything around us.",
    "I told my computer I needed a break, and it said 'No problem, I'll go to sleep.' Technology can be quite helpful when it comes to taking breaks, don't you think?",
    "Why was the math book sad? Because it had too many problems. But unlike math books, I'm here to help solve problems, not create them!",
    "Why did the programmer quit his job? He didn't get arrays! Programming humor aside, I'd love to help you with any questions you might have.",
    "How do you comfort a JavaScript bug? You console it! Speaking of coding, are you interested in programming or technology topics?",
];

/// Source of the local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The process's local time zone clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Keyword class an utterance falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    NotUnderstood,
    Greeting,
    Time,
    Date,
    Joke,
    Weather,
    Help,
    Generic,
}

/// Classify an utterance. Earlier classes win over later ones.
///
/// Only the empty string is not understood; whitespace-only text falls
/// through to [`ReplyKind::Generic`].
pub fn classify(text: &str) -> ReplyKind {
    if text.is_empty() {
        return ReplyKind::NotUnderstood;
    }
    let lowered = text.trim().to_lowercase();

    let has_any = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    if has_any(GREETING_KEYWORDS) {
        ReplyKind::Greeting
    } else if has_any(TIME_KEYWORDS) {
        ReplyKind::Time
    } else if has_any(DATE_KEYWORDS) {
        ReplyKind::Date
    } else if has_any(JOKE_KEYWORDS) {
        ReplyKind::Joke
    } else if has_any(WEATHER_KEYWORDS) {
        ReplyKind::Weather
    } else if has_any(HELP_KEYWORDS) {
        ReplyKind::Help
    } else {
        ReplyKind::Generic
    }
}

/// Canned-reply generator.
pub struct FallbackResponder {
    clock: Box<dyn Clock>,
    rng: Option<Mutex<StdRng>>,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FallbackResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackResponder")
            .field("seeded", &self.rng.is_some())
            .finish()
    }
}

impl FallbackResponder {
    /// Responder on the system clock with thread-local randomness.
    pub fn new() -> Self {
        Self {
            clock: Box::new(SystemClock),
            rng: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Draw jokes from a seeded generator instead of thread randomness.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Produce a reply for `text`. Never empty.
    pub fn reply(&self, text: &str) -> String {
        match classify(text) {
            ReplyKind::NotUnderstood => NOT_UNDERSTOOD_REPLY.to_string(),
            ReplyKind::Greeting => GREETING_REPLY.to_string(),
            ReplyKind::Time => {
                let now = self.clock.now();
                format!(
                    "The current time is {} on {}. Is there anything specific you'd like to do or discuss at this time?",
                    now.format("%I:%M %p"),
                    now.format("%A, %B %d, %Y"),
                )
            }
            ReplyKind::Date => {
                let today = self.clock.now();
                format!(
                    "Today is {}. It's a great day to learn something new or have an interesting conversation. What would you like to explore today?",
                    today.format("%A, %B %d, %Y"),
                )
            }
            ReplyKind::Joke => self.pick_joke().to_string(),
            ReplyKind::Weather => WEATHER_REPLY.to_string(),
            ReplyKind::Help => HELP_REPLY.to_string(),
            ReplyKind::Generic => GENERIC_REPLY.to_string(),
        }
    }

    fn pick_joke(&self) -> &'static str {
        let picked = match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                JOKES.choose(&mut *rng).copied()
            }
            None => JOKES.choose(&mut rand::rng()).copied(),
        };
        picked.unwrap_or(JOKES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed() -> FixedClock {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap();
        FixedClock(at)
    }

    #[test]
    fn test_empty_input_is_not_understood() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.reply(""), NOT_UNDERSTOOD_REPLY);
    }

    #[test]
    fn test_whitespace_input_is_generic() {
        let responder = FallbackResponder::new();
        assert_eq!(classify("   "), ReplyKind::Generic);
        assert_eq!(responder.reply(" \t\n "), GENERIC_REPLY);
    }

    #[test]
    fn test_greeting() {
        let responder = FallbackResponder::new();
        let reply = responder.reply("hello");
        assert!(reply.starts_with("Hello there!"));
        assert_eq!(classify("  Good Evening  "), ReplyKind::Greeting);
    }

    #[test]
    fn test_greeting_matches_by_substring() {
        // "this" contains "hi", and greeting is checked before time.
        assert_eq!(classify("what time is this"), ReplyKind::Greeting);
    }

    #[test]
    fn test_time_uses_clock() {
        let responder = FallbackResponder::new().with_clock(fixed());
        let reply = responder.reply("What's the TIME?");
        assert!(reply.contains("02:07 PM"), "got: {reply}");
        assert!(reply.contains("Tuesday, March 05, 2024"), "got: {reply}");
    }

    #[test]
    fn test_date_uses_clock() {
        let responder = FallbackResponder::new().with_clock(fixed());
        let reply = responder.reply("what is the date");
        assert!(reply.starts_with("Today is Tuesday, March 05, 2024."));
    }

    #[test]
    fn test_joke_is_from_fixed_set() {
        let responder = FallbackResponder::new();
        for _ in 0..20 {
            let reply = responder.reply("tell me a joke");
            assert!(JOKES.contains(&reply.as_str()));
        }
        assert_eq!(classify("be funny"), ReplyKind::Joke);
    }

    #[test]
    fn test_seeded_jokes_are_reproducible() {
        let a = FallbackResponder::new().with_rng_seed(9);
        let b = FallbackResponder::new().with_rng_seed(9);
        let seq_a: Vec<String> = (0..5).map(|_| a.reply("joke")).collect();
        let seq_b: Vec<String> = (0..5).map(|_| b.reply("joke")).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_weather_and_help() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.reply("weather forecast please"), WEATHER_REPLY);
        assert_eq!(responder.reply("what can you do"), HELP_REPLY);
    }

    #[test]
    fn test_generic_fallthrough() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.reply("quantum mechanics"), GENERIC_REPLY);
    }

    #[test]
    fn test_never_empty() {
        let responder = FallbackResponder::new();
        for input in ["", " ", "x", "joke", "time", "\u{1F600}", "ÅNGSTRÖM"] {
            assert!(!responder.reply(input).is_empty());
        }
    }
}
