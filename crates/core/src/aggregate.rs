//! Derived views over fetched plans and applications
//!
//! Nothing here is persisted; callers recompute on every render.

use crate::types::{InsuranceApplication, InsurancePlan};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Narrowing applied to plan and application lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring; blank matches everything
    pub search: String,
    /// Exact status, case-insensitive; `None` matches everything
    pub status: Option<String>,
    /// Exact policy type, case-insensitive; `None` matches everything
    pub policy_type: Option<String>,
}

impl ListFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_policy_type(mut self, policy_type: impl Into<String>) -> Self {
        self.policy_type = Some(policy_type.into());
        self
    }

    fn needle(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }
}

/// A plan together with how many applications reference it
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow<'a> {
    pub plan: &'a InsurancePlan,
    pub application_count: usize,
}

/// An application joined to its plan, when the plan is known
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRow<'a> {
    pub application: &'a InsuranceApplication,
    pub plan: Option<&'a InsurancePlan>,
}

/// Applications per plan id. Every plan appears, with zero when unused;
/// applications pointing at unknown plans are not counted.
pub fn count_applications_by_plan(
    plans: &[InsurancePlan],
    applications: &[InsuranceApplication],
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> =
        plans.iter().map(|plan| (plan.id.clone(), 0)).collect();

    for plan_id in applications.iter().filter_map(InsuranceApplication::plan_id) {
        if let Some(count) = counts.get_mut(plan_id) {
            *count += 1;
        }
    }
    counts
}

/// Pair each application with its plan, preserving application order
pub fn join_applications<'a>(
    applications: &'a [InsuranceApplication],
    plans: &'a [InsurancePlan],
) -> Vec<ApplicationRow<'a>> {
    let by_id: HashMap<&str, &InsurancePlan> =
        plans.iter().map(|plan| (plan.id.as_str(), plan)).collect();

    applications
        .iter()
        .map(|application| ApplicationRow {
            application,
            plan: application
                .plan_id()
                .and_then(|id| by_id.get(id).copied()),
        })
        .collect()
}

/// Plans with their application counts, narrowed by `filter`
///
/// The search term matches plan name or policy type.
pub fn filter_plans<'a>(
    plans: &'a [InsurancePlan],
    applications: &[InsuranceApplication],
    filter: &ListFilter,
) -> Vec<PlanRow<'a>> {
    let counts = count_applications_by_plan(plans, applications);
    let needle = filter.needle();

    plans
        .iter()
        .filter(|plan| {
            needle.as_deref().is_none_or(|needle| {
                contains_ignore_case(&plan.plan_name, needle)
                    || contains_ignore_case(&plan.policy_type, needle)
            })
        })
        .filter(|plan| matches_exact(filter.status.as_deref(), plan.status.as_deref()))
        .filter(|plan| {
            matches_exact(
                filter.policy_type.as_deref(),
                Some(plan.policy_type.as_str()),
            )
        })
        .map(|plan| PlanRow {
            plan,
            application_count: counts.get(&plan.id).copied().unwrap_or_default(),
        })
        .collect()
}

/// Joined applications narrowed by `filter`
///
/// The search term matches applicant name, applicant email or plan name.
pub fn filter_applications<'a>(
    rows: Vec<ApplicationRow<'a>>,
    filter: &ListFilter,
) -> Vec<ApplicationRow<'a>> {
    let needle = filter.needle();

    rows.into_iter()
        .filter(|row| {
            needle.as_deref().is_none_or(|needle| {
                contains_ignore_case(&row.application.applicant_name, needle)
                    || row
                        .application
                        .applicant_email
                        .as_deref()
                        .is_some_and(|email| contains_ignore_case(email, needle))
                    || row
                        .plan
                        .is_some_and(|plan| contains_ignore_case(&plan.plan_name, needle))
            })
        })
        .filter(|row| {
            matches_exact(
                filter.status.as_deref(),
                Some(row.application.status.as_str()),
            )
        })
        .filter(|row| {
            matches_exact(
                filter.policy_type.as_deref(),
                row.plan.map(|plan| plan.policy_type.as_str()),
            )
        })
        .collect()
}

/// Distinct policy types, sorted, for filter dropdowns
pub fn distinct_policy_types(plans: &[InsurancePlan]) -> Vec<String> {
    plans
        .iter()
        .map(|plan| plan.policy_type.trim())
        .filter(|policy_type| !policy_type.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Applications per lower-cased status
pub fn status_counts(applications: &[InsuranceApplication]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for application in applications {
        *counts
            .entry(application.status.to_lowercase())
            .or_insert(0) += 1;
    }
    counts
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn matches_exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual.is_some_and(|actual| actual.eq_ignore_ascii_case(wanted)),
    }
}
