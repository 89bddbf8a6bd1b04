//! Quiz configuration: question limit, category filter and timing
//!
//! Values come from three places, lowest priority first: the defaults below,
//! `N1QUIZ_*` environment variables ([`QuizConfig::from_env`]), and command
//! line flags applied by the binaries.

use crate::error::{QuizError, QuizResult};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Smallest number of questions a quiz may ask for
pub const MIN_LIMIT: usize = 10;
/// Largest number of questions a quiz may ask for
pub const MAX_LIMIT: usize = 3000;
/// Limit used when the user gives none
pub const DEFAULT_LIMIT: usize = MAX_LIMIT;

/// Clamp a user supplied limit into `[MIN_LIMIT, MAX_LIMIT]`
///
/// Zero and negative values become `MIN_LIMIT`.
pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize
}

/// Parse the limit text field; empty or unparseable input means `DEFAULT_LIMIT`
pub fn parse_limit(input: &str) -> usize {
    match input.trim().parse::<i64>() {
        Ok(n) => clamp_limit(n),
        Err(_) => DEFAULT_LIMIT,
    }
}

/// Question category filter: every part of speech, or one tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Tag(String),
}

impl Category {
    pub fn matches(&self, part_of_speech: &str) -> bool {
        match self {
            Category::All => true,
            Category::Tag(tag) => tag == part_of_speech,
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Category::All)
        } else {
            Ok(Category::Tag(s.to_string()))
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => write!(f, "all"),
            Category::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// Already clamped question limit
    pub limit: usize,
    pub category: Category,
    /// Per-request HTTP timeout
    pub fetch_timeout: Duration,
    /// Upper bound on one source's whole fetch, pagination included
    pub source_deadline: Duration,
    /// Seconds the player has per question
    pub answer_time_limit: Duration,
    /// Fixed seed for reproducible question sets
    pub seed: Option<u64>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            category: Category::All,
            fetch_timeout: Duration::from_secs(10),
            source_deadline: Duration::from_secs(30),
            answer_time_limit: Duration::from_secs(5),
            seed: None,
        }
    }
}

impl QuizConfig {
    /// Defaults overlaid with the `N1QUIZ_*` environment variables
    pub fn from_env() -> QuizResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`QuizConfig::from_env`] with an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> QuizResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(limit) = lookup("N1QUIZ_LIMIT") {
            config.limit = parse_limit(&limit);
        }
        if let Some(category) = lookup("N1QUIZ_CATEGORY") {
            config.category = category.parse().unwrap_or_default();
        }
        if let Some(secs) = lookup("N1QUIZ_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = parse_secs("N1QUIZ_FETCH_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("N1QUIZ_TIME_LIMIT_SECS") {
            config.answer_time_limit = parse_secs("N1QUIZ_TIME_LIMIT_SECS", &secs)?;
        }
        if let Some(seed) = lookup("N1QUIZ_SEED") {
            let seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|_| QuizError::Config(format!("N1QUIZ_SEED is not a number: {}", seed)))?;
            config.seed = Some(seed);
        }

        Ok(config)
    }
}

fn parse_secs(key: &str, value: &str) -> QuizResult<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(QuizError::Config(format!("{} must be positive", key))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(QuizError::Config(format!(
            "{} is not a number of seconds: {}",
            key, value
        ))),
    }
}
