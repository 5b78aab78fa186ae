//! Matchmaking endpoints.

use std::fmt;

/// The matchmaking queue to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchmakingMode {
    /// Paired with any waiting player.
    Random,
    /// Paired by rating.
    Ranked,
    /// Private rooms created and joined by id.
    Custom,
}

impl MatchmakingMode {
    /// Path of this queue on the matchmaking service.
    pub fn path(self) -> &'static str {
        match self {
            Self::Random => "/matchmaking/random",
            Self::Ranked => "/matchmaking/ranked",
            Self::Custom => "/matchmaking/custom",
        }
    }

    /// Resolves this queue against a base URL such as `ws://host:80`.
    ///
    /// Any path already on `base` is kept; a trailing slash is not doubled.
    pub fn url(self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for MatchmakingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::Ranked => "ranked",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}
