//! Cohort classification of clients between two adjacent periods.

use serde::Serialize;

use crate::reporting::PeriodSeries;

#[derive(Debug, Clone, Serialize)]
pub struct CohortMember {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub current_amount: f64,
    pub prior_amount: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CohortBucket {
    pub members: Vec<CohortMember>,
    pub total_amount: f64,
}

impl CohortBucket {
    fn push(&mut self, member: CohortMember, accrued: f64) {
        self.total_amount += accrued;
        self.members.push(member);
    }
}

/// The four exclusive buckets plus the independent active lists.
///
/// Clients with equal non-zero amounts in both periods land in none of
/// the four buckets; there is intentionally no "flat" bucket. They still
/// count in both active lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CohortSummary {
    pub new: CohortBucket,
    pub stopped: CohortBucket,
    pub rising: CohortBucket,
    pub falling: CohortBucket,
    pub active_current: Vec<CohortMember>,
    pub active_prior: Vec<CohortMember>,
}

impl CohortSummary {
    /// `"N → M"` — active client count, prior period → current period.
    pub fn transition_label(&self) -> String {
        format!(
            "{} → {}",
            self.active_prior.len(),
            self.active_current.len()
        )
    }
}

/// Partition `series` by comparing the `current` and `prior` period
/// indices of each entry. Bucket totals accrue the entry's amount for
/// new (current) and stopped (prior), and the absolute change for
/// rising/falling.
pub fn classify(series: &[PeriodSeries], current: i64, prior: i64) -> CohortSummary {
    let mut summary = CohortSummary::default();

    for entry in series {
        let a = entry.amount(current);
        let b = entry.amount(prior);
        let member = CohortMember {
            id: entry.id.clone(),
            name: entry.name.clone(),
            current_amount: a,
            prior_amount: b,
        };

        if a > 0.0 {
            summary.active_current.push(member.clone());
        }
        if b > 0.0 {
            summary.active_prior.push(member.clone());
        }

        if b == 0.0 && a > 0.0 {
            summary.new.push(member, a);
        } else if b > 0.0 && a == 0.0 {
            summary.stopped.push(member, b);
        } else if a > 0.0 && b > 0.0 && a > b {
            summary.rising.push(member, a - b);
        } else if a > 0.0 && b > 0.0 && a < b {
            summary.falling.push(member, b - a);
        }
        // equal non-zero amounts: no bucket
    }

    summary
}
