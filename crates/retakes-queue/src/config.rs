//! Queue configuration and the round phase state machine.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::QueueError;

// ---------------------------------------------------------------------------
// QueueConfig
// ---------------------------------------------------------------------------

/// Configuration for a queue scheduler.
///
/// Read-only once the scheduler is built. `#[serde(default)]` lets a
/// host deserialize a partial config and keep the defaults for
/// anything it leaves out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of players on the two playing sides combined.
    pub max_active_players: usize,

    /// Fraction of active players that should be Terrorists.
    /// Must lie strictly between 0 and 1.
    pub terrorist_ratio: f64,

    /// Permission tags that grant queue priority (e.g. `@css/vip`).
    pub priority_tags: Vec<String>,

    /// Split teams 50/50 whenever the active count is a multiple of 10.
    pub force_even_teams_on_multiple_of_ten: bool,

    /// Lock each player to their side for the duration of a round.
    pub prevent_mid_round_team_changes: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_active_players: 9,
            terrorist_ratio: 0.45,
            priority_tags: vec!["@css/vip".to_string()],
            force_even_teams_on_multiple_of_ten: true,
            prevent_mid_round_team_changes: true,
        }
    }
}

impl QueueConfig {
    /// Lowest ratio [`Self::validated`] clamps to.
    pub const MIN_TERRORIST_RATIO: f64 = 0.05;

    /// Highest ratio [`Self::validated`] clamps to.
    pub const MAX_TERRORIST_RATIO: f64 = 0.95;

    /// Checks every field against its documented range.
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidConfig`] naming the first field that
    /// is out of range.
    pub fn validate(&self) -> Result<(), QueueError> {
        if self.max_active_players == 0 {
            return Err(QueueError::InvalidConfig(
                "max_active_players must be greater than 0".to_string(),
            ));
        }
        if !(self.terrorist_ratio > 0.0 && self.terrorist_ratio < 1.0) {
            return Err(QueueError::InvalidConfig(format!(
                "terrorist_ratio must be between 0 and 1 (exclusive), got {}",
                self.terrorist_ratio
            )));
        }
        if self.priority_tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(QueueError::InvalidConfig(
                "priority_tags must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Rules:
    /// - `max_active_players` raised to 1 if it is 0.
    /// - `terrorist_ratio` NaN falls back to the default; `<= 0` becomes
    ///   [`Self::MIN_TERRORIST_RATIO`], `>= 1` becomes
    ///   [`Self::MAX_TERRORIST_RATIO`].
    /// - `priority_tags` trimmed, blanks and duplicates dropped.
    pub fn validated(mut self) -> Self {
        if self.max_active_players == 0 {
            warn!("max_active_players is 0, clamping to 1");
            self.max_active_players = 1;
        }

        let ratio = self.terrorist_ratio;
        if ratio.is_nan() {
            warn!("terrorist_ratio is NaN, using default");
            self.terrorist_ratio = Self::default().terrorist_ratio;
        } else if ratio <= 0.0 {
            warn!(ratio, min = Self::MIN_TERRORIST_RATIO, "terrorist_ratio too low, clamping");
            self.terrorist_ratio = Self::MIN_TERRORIST_RATIO;
        } else if ratio >= 1.0 {
            warn!(ratio, max = Self::MAX_TERRORIST_RATIO, "terrorist_ratio too high, clamping");
            self.terrorist_ratio = Self::MAX_TERRORIST_RATIO;
        }

        let mut tags: Vec<String> = Vec::with_capacity(self.priority_tags.len());
        for tag in self.priority_tags.iter().map(|t| t.trim()) {
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        self.priority_tags = tags;
        self
    }
}

/// Parses a comma-separated tag list such as `"@css/vip, @css/root"`.
///
/// Whitespace around each tag is trimmed and empty entries are dropped.
pub fn parse_priority_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// RoundPhase
// ---------------------------------------------------------------------------

/// Whether a round is currently being played.
///
/// ```text
/// Pending ──(round start)──→ Live ──(round end)──→ Pending
/// ```
///
/// The round team lock is only populated while `Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    #[default]
    Pending,
    Live,
}

impl RoundPhase {
    /// Returns `true` while a round is in progress.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::Live,
            Self::Live => Self::Pending,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Live => write!(f, "Live"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_config_default() {
        let config = QueueConfig::default();
        assert_eq!(config.max_active_players, 9);
        assert_eq!(config.terrorist_ratio, 0.45);
        assert_eq!(config.priority_tags, vec!["@css/vip".to_string()]);
        assert!(config.force_even_teams_on_multiple_of_ten);
        assert!(config.prevent_mid_round_team_changes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = QueueConfig {
            max_active_players: 0,
            ..QueueConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_active_players"));
    }

    #[test]
    fn test_validate_rejects_ratio_bounds() {
        for ratio in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let config = QueueConfig {
                terrorist_ratio: ratio,
                ..QueueConfig::default()
            };
            assert!(config.validate().is_err(), "ratio {ratio} should be rejected");
        }
    }

    #[test]
    fn test_validate_rejects_blank_tag() {
        let config = QueueConfig {
            priority_tags: vec!["@css/vip".into(), "  ".into()],
            ..QueueConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validated_clamps_out_of_range_values() {
        let config = QueueConfig {
            max_active_players: 0,
            terrorist_ratio: 1.2,
            priority_tags: vec![" @css/vip ".into(), "".into(), "@css/vip".into()],
            ..QueueConfig::default()
        }
        .validated();

        assert_eq!(config.max_active_players, 1);
        assert_eq!(config.terrorist_ratio, QueueConfig::MAX_TERRORIST_RATIO);
        assert_eq!(config.priority_tags, vec!["@css/vip".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validated_low_and_nan_ratio() {
        let low = QueueConfig {
            terrorist_ratio: -1.0,
            ..QueueConfig::default()
        }
        .validated();
        assert_eq!(low.terrorist_ratio, QueueConfig::MIN_TERRORIST_RATIO);

        let nan = QueueConfig {
            terrorist_ratio: f64::NAN,
            ..QueueConfig::default()
        }
        .validated();
        assert_eq!(nan.terrorist_ratio, 0.45);
    }

    #[test]
    fn test_validated_keeps_valid_config_untouched() {
        let config = QueueConfig {
            terrorist_ratio: 0.01,
            ..QueueConfig::default()
        };
        assert_eq!(config.clone().validated(), config);
    }

    #[test]
    fn test_parse_priority_tags() {
        assert_eq!(
            parse_priority_tags("@css/vip, @css/root,,  "),
            vec!["@css/vip".to_string(), "@css/root".to_string()]
        );
        assert!(parse_priority_tags("").is_empty());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: QueueConfig =
            serde_json::from_str(r#"{ "max_active_players": 5 }"#).unwrap();
        assert_eq!(config.max_active_players, 5);
        assert_eq!(config.terrorist_ratio, 0.45);
        assert!(config.prevent_mid_round_team_changes);
    }

    #[test]
    fn test_round_phase_alternates() {
        assert_eq!(RoundPhase::Pending.next(), RoundPhase::Live);
        assert_eq!(RoundPhase::Live.next(), RoundPhase::Pending);
        assert!(RoundPhase::Pending.can_transition_to(RoundPhase::Live));
        assert!(!RoundPhase::Live.can_transition_to(RoundPhase::Live));
        assert!(!RoundPhase::Pending.is_live());
        assert!(RoundPhase::Live.is_live());
    }

    #[test]
    fn test_round_phase_display() {
        assert_eq!(RoundPhase::Pending.to_string(), "Pending");
        assert_eq!(RoundPhase::Live.to_string(), "Live");
    }
}
