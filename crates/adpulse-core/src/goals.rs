//! Revenue goal tracking.
//!
//! A goal's progress is derived per request by applying the comparison
//! engine to the 2-period series (start revenue, current revenue); the
//! achievement rate shares the same three-way zero policy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::compare::{compare_amounts, ratio_label, ComparisonResult};
use crate::error::CoreError;
use crate::week::{week_bounds, WeekBounds};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    WeeklyRevenue,
    MonthlyRevenue,
}

impl GoalCategory {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "weekly_revenue" => Ok(Self::WeeklyRevenue),
            "monthly_revenue" => Ok(Self::MonthlyRevenue),
            _ => Err(CoreError::InvalidCategory(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeeklyRevenue => "weekly_revenue",
            Self::MonthlyRevenue => "monthly_revenue",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub category: GoalCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_revenue: f64,
    pub start_revenue: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub client_id: String,
    pub name: String,
    pub category: GoalCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_revenue: f64,
    pub start_revenue: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGoalRequest {
    pub name: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub target_revenue: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub as_of: NaiveDate,
    pub current_revenue: f64,
    /// Percent of `target_revenue` reached; `∞`/`0.0` sentinels apply.
    pub achievement_rate: f64,
    pub achievement_label: String,
    /// Current revenue vs the goal's start revenue.
    pub growth: ComparisonResult,
    /// Present for weekly goals: the Monday–Sunday week containing `as_of`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<WeekBounds>,
}

/// Percent of `target` reached by `current`, with the three-way zero
/// policy of the ratio engine.
pub fn achievement_rate(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        (current / target) * 100.0
    } else if current > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

pub fn goal_progress(goal: &Goal, current_revenue: f64, as_of: NaiveDate) -> GoalProgress {
    let rate = achievement_rate(current_revenue, goal.target_revenue);
    GoalProgress {
        goal_id: goal.id.clone(),
        as_of,
        current_revenue,
        achievement_rate: rate,
        achievement_label: ratio_label(rate),
        growth: compare_amounts(current_revenue, goal.start_revenue),
        week: matches!(goal.category, GoalCategory::WeeklyRevenue)
            .then(|| week_bounds(as_of, 0)),
    }
}
