//! Rule-based insight generator
//!
//! Offline generator that turns the analytics engine's output into a short
//! narrative. Used when no remote model is configured.

use crate::analytics::{
    average_mood, rolling_load, sober_streak, substance_trends, total_alcohol_units, window,
    TrendDirection, CURRENT_WINDOW,
};
use crate::insight::{InsightError, InsightGenerator};
use crate::storage::DailyLogEntry;
use async_trait::async_trait;

/// Narrative built from streaks, loads, trends and mood
#[derive(Debug, Clone, Default)]
pub struct RuleBasedInsight;

impl RuleBasedInsight {
    pub fn new() -> Self {
        Self
    }

    /// Compose the narrative for a non-empty history
    pub fn compose(&self, history: &[DailyLogEntry]) -> Option<String> {
        if history.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        self.describe_alcohol(&mut parts, history);
        self.describe_substances(&mut parts, history);
        self.describe_mood(&mut parts, history);

        Some(parts.join(" "))
    }

    fn describe_alcohol(&self, parts: &mut Vec<String>, history: &[DailyLogEntry]) {
        let streak = sober_streak(history);
        match streak {
            0 => {
                let units = total_alcohol_units(window(history, 0, CURRENT_WINDOW));
                parts.push(format!(
                    "Alcohol was logged on your most recent entry ({:.1} units across the last week).",
                    units
                ));
            }
            1 => parts.push("Your latest entry is alcohol-free.".to_string()),
            n if n == history.len() => {
                parts.push(format!("All {} logged entries are alcohol-free.", n))
            }
            n => parts.push(format!("{} consecutive alcohol-free entries.", n)),
        }
    }

    fn describe_substances(&self, parts: &mut Vec<String>, history: &[DailyLogEntry]) {
        if let Some(top) = rolling_load(history).first() {
            parts.push(format!(
                "{} is your main substance at {:.1}{} per entry.",
                top.label,
                top.display_average(),
                top.unit
            ));
        }

        let trends = substance_trends(history);
        let names = |direction: TrendDirection| {
            trends
                .iter()
                .filter(|t| t.direction == direction)
                .map(|t| t.label.as_str())
                .collect::<Vec<_>>()
        };

        let falling = names(TrendDirection::Down);
        if !falling.is_empty() {
            parts.push(format!("Decreasing versus last week: {}.", falling.join(", ")));
        }

        let rising = names(TrendDirection::Up);
        if !rising.is_empty() {
            parts.push(format!("Increasing versus last week: {}.", rising.join(", ")));
        }
    }

    fn describe_mood(&self, parts: &mut Vec<String>, history: &[DailyLogEntry]) {
        let Some(mood) = average_mood(window(history, 0, CURRENT_WINDOW)) else {
            return;
        };

        if mood < 4.0 {
            parts.push(format!(
                "Mood has been low (averaging {:.1}); consider reaching out to someone you trust.",
                mood
            ));
        } else if mood > 7.0 {
            parts.push(format!("Mood has been good, averaging {:.1}.", mood));
        } else {
            parts.push(format!("Mood has been moderate, averaging {:.1}.", mood));
        }
    }
}

#[async_trait]
impl InsightGenerator for RuleBasedInsight {
    fn name(&self) -> &str {
        "rules"
    }

    async fn generate(&self, history: &[DailyLogEntry]) -> Result<Option<String>, InsightError> {
        Ok(self.compose(history))
    }
}
