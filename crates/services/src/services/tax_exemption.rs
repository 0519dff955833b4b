//! Tax exemption evaluation for a stay.
//!
//! Rules are scanned in the order the store returns them (insertion order)
//! and the first rule whose night range matches decides the outcome, even
//! when a later rule would be more favorable. Rule order is the only
//! priority mechanism a campground has.

use db::models::tax_rule::TaxRule;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaxExemptionError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of evaluating a campground's exemption rules against a stay.
///
/// `eligible && !applied` is the one distinguished outcome: a rule matched
/// but its waiver was not signed, so the tax line stays. Callers branch on
/// `applied` to decide whether to suppress the tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ExemptionResult {
    pub eligible: bool,
    pub applied: bool,
    pub rule: Option<TaxRule>,
    pub reason: Option<String>,
}

impl ExemptionResult {
    fn not_eligible() -> Self {
        Self {
            eligible: false,
            applied: false,
            rule: None,
            reason: None,
        }
    }

    fn applied(rule: TaxRule) -> Self {
        Self {
            eligible: true,
            applied: true,
            rule: Some(rule),
            reason: None,
        }
    }

    fn waiver_required(rule: TaxRule) -> Self {
        Self {
            eligible: true,
            applied: false,
            rule: Some(rule),
            reason: Some("Waiver required".to_string()),
        }
    }
}

/// First-match-wins scan over already-fetched rules. Night bounds are
/// inclusive; an unset bound imposes no constraint on that side.
pub fn evaluate_rules(rules: &[TaxRule], nights: i64, waiver_signed: bool) -> ExemptionResult {
    for rule in rules {
        let meets_min = rule.min_nights.is_none_or(|min| nights >= min);
        let meets_max = rule.max_nights.is_none_or(|max| nights <= max);
        if meets_min && meets_max {
            if rule.requires_waiver && !waiver_signed {
                return ExemptionResult::waiver_required(rule.clone());
            }
            return ExemptionResult::applied(rule.clone());
        }
    }
    ExemptionResult::not_eligible()
}

pub struct TaxExemptionService {
    pool: SqlitePool,
}

impl TaxExemptionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Evaluate the applicable exemption for a stay at a campground.
    pub async fn evaluate(
        &self,
        campground_id: Uuid,
        nights: i64,
        waiver_signed: bool,
    ) -> Result<ExemptionResult, TaxExemptionError> {
        let rules = TaxRule::find_active_exemptions(&self.pool, campground_id).await?;
        let result = evaluate_rules(&rules, nights, waiver_signed);
        tracing::debug!(
            %campground_id,
            nights,
            waiver_signed,
            eligible = result.eligible,
            applied = result.applied,
            rule_id = ?result.rule.as_ref().map(|r| r.id),
            "evaluated tax exemption"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use db::models::tax_rule::{CreateTaxRule, TaxRuleType};
    use db::DBService;

    fn rule(
        name: &str,
        min_nights: Option<i64>,
        max_nights: Option<i64>,
        requires_waiver: bool,
    ) -> TaxRule {
        let now = Utc::now();
        TaxRule {
            id: Uuid::new_v4(),
            campground_id: Uuid::new_v4(),
            name: name.to_string(),
            rule_type: TaxRuleType::Exemption,
            rate: None,
            min_nights,
            max_nights,
            requires_waiver,
            waiver_text: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_rules_means_not_eligible() {
        let result = evaluate_rules(&[], 10, true);
        assert!(!result.eligible);
        assert!(!result.applied);
        assert!(result.rule.is_none());
        assert!(result.reason.is_none());
    }

    #[test]
    fn unconstrained_rule_applies_to_any_stay() {
        let rules = vec![rule("Always exempt", None, None, false)];
        for nights in [0, 1, 365] {
            let result = evaluate_rules(&rules, nights, false);
            assert!(result.eligible);
            assert!(result.applied);
        }
    }

    #[test]
    fn night_bounds_are_inclusive() {
        let rules = vec![rule("Mid stay", Some(7), Some(30), false)];

        assert!(evaluate_rules(&rules, 7, false).applied);
        assert!(evaluate_rules(&rules, 30, false).applied);
        assert!(!evaluate_rules(&rules, 6, false).eligible);
        assert!(!evaluate_rules(&rules, 31, false).eligible);
    }

    #[test]
    fn min_only_rule_has_no_upper_bound() {
        let rules = vec![rule("Long stay", Some(30), None, false)];
        assert!(evaluate_rules(&rules, 30, false).applied);
        assert!(evaluate_rules(&rules, 400, false).applied);
        assert!(!evaluate_rules(&rules, 29, false).eligible);
    }

    #[test]
    fn unsigned_waiver_blocks_application_but_keeps_eligibility() {
        let rules = vec![rule("Resident", Some(30), None, true)];

        let blocked = evaluate_rules(&rules, 45, false);
        assert!(blocked.eligible);
        assert!(!blocked.applied);
        assert_eq!(blocked.reason.as_deref(), Some("Waiver required"));
        assert!(blocked.rule.is_some());

        let applied = evaluate_rules(&rules, 45, true);
        assert!(applied.eligible);
        assert!(applied.applied);
        assert!(applied.reason.is_none());
    }

    #[test]
    fn first_matching_rule_wins_over_later_matches() {
        let first = rule("30+ nights", Some(30), None, false);
        let second = rule("Any stay", None, None, false);
        let first_id = first.id;

        let result = evaluate_rules(&[first, second], 45, false);
        assert_eq!(result.rule.map(|r| r.id), Some(first_id));
    }

    #[test]
    fn non_matching_leading_rule_falls_through() {
        let first = rule("30+ nights", Some(30), None, false);
        let second = rule("7+ nights", Some(7), None, false);
        let second_id = second.id;

        let result = evaluate_rules(&[first, second], 10, false);
        assert!(result.applied);
        assert_eq!(result.rule.map(|r| r.id), Some(second_id));
    }

    #[test]
    fn waiver_gated_first_match_is_terminal() {
        // The second rule would apply without a waiver, but evaluation
        // stops at the first night-range match.
        let first = rule("Resident", Some(30), None, true);
        let second = rule("Any stay", None, None, false);
        let first_id = first.id;

        let result = evaluate_rules(&[first, second], 45, false);
        assert!(result.eligible);
        assert!(!result.applied);
        assert_eq!(result.rule.map(|r| r.id), Some(first_id));
    }

    #[tokio::test]
    async fn service_fetches_rules_in_insertion_order() {
        let db = DBService::new_in_memory().await.unwrap();
        let campground_id = Uuid::new_v4();

        let strict = CreateTaxRule {
            campground_id,
            name: "30+ nights".to_string(),
            rule_type: TaxRuleType::Exemption,
            rate: None,
            min_nights: Some(30),
            max_nights: None,
            requires_waiver: Some(false),
            waiver_text: None,
        };
        let strict_id = Uuid::new_v4();
        TaxRule::create(&db.pool, &strict, strict_id).await.unwrap();

        let lenient = CreateTaxRule {
            min_nights: None,
            name: "Any stay".to_string(),
            ..strict.clone()
        };
        TaxRule::create(&db.pool, &lenient, Uuid::new_v4()).await.unwrap();

        let service = TaxExemptionService::new(db.pool.clone());
        let result = service.evaluate(campground_id, 45, false).await.unwrap();
        assert!(result.applied);
        assert_eq!(result.rule.map(|r| r.id), Some(strict_id));

        let no_rules = service.evaluate(Uuid::new_v4(), 45, false).await.unwrap();
        assert!(!no_rules.eligible);
        assert!(no_rules.rule.is_none());
    }
}
