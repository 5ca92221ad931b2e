use serde::{Deserialize, Serialize};

pub const DEFAULT_PRODUCTION_DEPARTMENT: &str = "Production";

/// Rounding applied to every displayed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRounding {
    Floor,
    #[default]
    Nearest,
    OneDecimal,
}

impl ScoreRounding {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "floor" => Some(Self::Floor),
            "nearest" | "round" => Some(Self::Nearest),
            "one_decimal" | "one-decimal" | "decimal" => Some(Self::OneDecimal),
            _ => None,
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        let rounded = match self {
            Self::Floor => value.floor(),
            Self::Nearest => value.round(),
            Self::OneDecimal => (value * 10.0).round() / 10.0,
        };

        if rounded.is_finite() {
            rounded.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Scoring dials shared by area, employee and department scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    production_department: String,
    rounding: ScoreRounding,
}

impl ScoringPolicy {
    pub fn new(production_department: impl Into<String>, rounding: ScoreRounding) -> Self {
        Self {
            production_department: production_department.into(),
            rounding,
        }
    }

    pub fn production_department(&self) -> &str {
        &self.production_department
    }

    pub fn rounding(&self) -> ScoreRounding {
        self.rounding
    }

    /// Exact label match; "production" or "Production Support" do not qualify.
    pub fn is_production(&self, department_name: &str) -> bool {
        department_name == self.production_department
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCTION_DEPARTMENT, ScoreRounding::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_modes_differ_only_in_precision() {
        let raw = 10.0 / 23.0 * 100.0;
        assert_eq!(ScoreRounding::Floor.apply(raw), 43.0);
        assert_eq!(ScoreRounding::Nearest.apply(raw), 43.0);
        assert_eq!(ScoreRounding::OneDecimal.apply(raw), 43.5);
        assert_eq!(ScoreRounding::Nearest.apply(99.6), 100.0);
        assert_eq!(ScoreRounding::Floor.apply(99.6), 99.0);
    }

    #[test]
    fn rounding_clamps_and_rejects_nan() {
        assert_eq!(ScoreRounding::Nearest.apply(140.0), 100.0);
        assert_eq!(ScoreRounding::Nearest.apply(-3.0), 0.0);
        assert_eq!(ScoreRounding::OneDecimal.apply(f64::NAN), 0.0);
    }

    #[test]
    fn parse_accepts_config_spellings() {
        assert_eq!(ScoreRounding::parse(" Floor "), Some(ScoreRounding::Floor));
        assert_eq!(ScoreRounding::parse("one-decimal"), Some(ScoreRounding::OneDecimal));
        assert_eq!(ScoreRounding::parse("ceil"), None);
    }

    #[test]
    fn production_match_is_exact() {
        let policy = ScoringPolicy::default();
        assert!(policy.is_production("Production"));
        assert!(!policy.is_production("production"));
        assert!(!policy.is_production("Production Support"));
    }
}
