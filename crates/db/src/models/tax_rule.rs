use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Kind of tax rule configured by a campground.
#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[sqlx(type_name = "tax_rule_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaxRuleType {
    #[default]
    Rate,
    Exemption,
}

/// A campground-configured tax rule. `rate` rules add a tax line;
/// `exemption` rules waive it for qualifying stays.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, TS)]
pub struct TaxRule {
    pub id: Uuid,
    pub campground_id: Uuid,
    pub name: String,
    pub rule_type: TaxRuleType,
    pub rate: Option<f64>,
    pub min_nights: Option<i64>,
    pub max_nights: Option<i64>,
    pub requires_waiver: bool,
    pub waiver_text: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a tax rule
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTaxRule {
    pub campground_id: Uuid,
    pub name: String,
    pub rule_type: TaxRuleType,
    pub rate: Option<f64>,
    pub min_nights: Option<i64>,
    pub max_nights: Option<i64>,
    pub requires_waiver: Option<bool>,
    pub waiver_text: Option<String>,
}

/// Partial update: unset fields keep their stored values
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateTaxRule {
    pub name: Option<String>,
    pub rule_type: Option<TaxRuleType>,
    pub rate: Option<f64>,
    pub min_nights: Option<i64>,
    pub max_nights: Option<i64>,
    pub requires_waiver: Option<bool>,
    pub waiver_text: Option<String>,
    pub is_active: Option<bool>,
}

const TAX_RULE_COLUMNS: &str = "id, campground_id, name, rule_type, rate, min_nights, max_nights, requires_waiver, waiver_text, is_active, created_at, updated_at";

impl TaxRule {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTaxRule,
        rule_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let requires_waiver = data.requires_waiver.unwrap_or(false);
        let sql = format!(
            "INSERT INTO tax_rules (id, campground_id, name, rule_type, rate, min_nights, max_nights, requires_waiver, waiver_text)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {TAX_RULE_COLUMNS}"
        );
        sqlx::query_as::<_, TaxRule>(&sql)
            .bind(rule_id)
            .bind(data.campground_id)
            .bind(&data.name)
            .bind(&data.rule_type)
            .bind(data.rate)
            .bind(data.min_nights)
            .bind(data.max_nights)
            .bind(requires_waiver)
            .bind(&data.waiver_text)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TAX_RULE_COLUMNS} FROM tax_rules WHERE id = $1");
        sqlx::query_as::<_, TaxRule>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rules for a campground, newest first.
    pub async fn find_by_campground_id(
        pool: &SqlitePool,
        campground_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TAX_RULE_COLUMNS} FROM tax_rules
             WHERE campground_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, TaxRule>(&sql)
            .bind(campground_id)
            .fetch_all(pool)
            .await
    }

    /// Active exemption rules in insertion order. Evaluation is
    /// first-match-wins, so the order returned here decides the outcome.
    pub async fn find_active_exemptions(
        pool: &SqlitePool,
        campground_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TAX_RULE_COLUMNS} FROM tax_rules
             WHERE campground_id = $1 AND rule_type = 'exemption' AND is_active = 1
             ORDER BY created_at ASC, rowid ASC"
        );
        sqlx::query_as::<_, TaxRule>(&sql)
            .bind(campground_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateTaxRule,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE tax_rules
             SET name = COALESCE($2, name),
                 rule_type = COALESCE($3, rule_type),
                 rate = COALESCE($4, rate),
                 min_nights = COALESCE($5, min_nights),
                 max_nights = COALESCE($6, max_nights),
                 requires_waiver = COALESCE($7, requires_waiver),
                 waiver_text = COALESCE($8, waiver_text),
                 is_active = COALESCE($9, is_active),
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {TAX_RULE_COLUMNS}"
        );
        sqlx::query_as::<_, TaxRule>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.rule_type)
            .bind(data.rate)
            .bind(data.min_nights)
            .bind(data.max_nights)
            .bind(data.requires_waiver)
            .bind(&data.waiver_text)
            .bind(data.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tax_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    fn create_data(campground_id: Uuid, name: &str) -> CreateTaxRule {
        CreateTaxRule {
            campground_id,
            name: name.to_string(),
            rule_type: TaxRuleType::Exemption,
            rate: None,
            min_nights: Some(30),
            max_nights: None,
            requires_waiver: Some(false),
            waiver_text: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_round_trip() {
        let db = DBService::new_in_memory().await.unwrap();
        let campground_id = Uuid::new_v4();
        let rule_id = Uuid::new_v4();

        let created = TaxRule::create(&db.pool, &create_data(campground_id, "Monthly"), rule_id)
            .await
            .unwrap();
        assert_eq!(created.id, rule_id);
        assert_eq!(created.rule_type, TaxRuleType::Exemption);
        assert_eq!(created.min_nights, Some(30));
        assert!(!created.requires_waiver);
        assert!(created.is_active);

        let found = TaxRule::find_by_id(&db.pool, rule_id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown() {
        let db = DBService::new_in_memory().await.unwrap();
        let found = TaxRule::find_by_id(&db.pool, Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn partial_update_keeps_unset_fields() {
        let db = DBService::new_in_memory().await.unwrap();
        let campground_id = Uuid::new_v4();
        let rule_id = Uuid::new_v4();
        TaxRule::create(&db.pool, &create_data(campground_id, "Monthly"), rule_id)
            .await
            .unwrap();

        let updated = TaxRule::update(
            &db.pool,
            rule_id,
            &UpdateTaxRule {
                name: Some("Monthly resident".to_string()),
                rule_type: None,
                rate: None,
                min_nights: None,
                max_nights: None,
                requires_waiver: None,
                waiver_text: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap()
        .expect("rule exists");

        assert_eq!(updated.name, "Monthly resident");
        assert_eq!(updated.min_nights, Some(30));
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn update_unknown_rule_returns_none() {
        let db = DBService::new_in_memory().await.unwrap();
        let updated = TaxRule::update(
            &db.pool,
            Uuid::new_v4(),
            &UpdateTaxRule {
                name: Some("x".to_string()),
                rule_type: None,
                rate: None,
                min_nights: None,
                max_nights: None,
                requires_waiver: None,
                waiver_text: None,
                is_active: None,
            },
        )
        .await
        .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn active_exemption_fetch_skips_inactive_and_rate_rules() {
        let db = DBService::new_in_memory().await.unwrap();
        let campground_id = Uuid::new_v4();

        let exemption_id = Uuid::new_v4();
        TaxRule::create(&db.pool, &create_data(campground_id, "Monthly"), exemption_id)
            .await
            .unwrap();

        let mut rate_rule = create_data(campground_id, "Lodging tax");
        rate_rule.rule_type = TaxRuleType::Rate;
        rate_rule.rate = Some(0.08);
        TaxRule::create(&db.pool, &rate_rule, Uuid::new_v4()).await.unwrap();

        let disabled_id = Uuid::new_v4();
        TaxRule::create(&db.pool, &create_data(campground_id, "Disabled"), disabled_id)
            .await
            .unwrap();
        TaxRule::update(
            &db.pool,
            disabled_id,
            &UpdateTaxRule {
                name: None,
                rule_type: None,
                rate: None,
                min_nights: None,
                max_nights: None,
                requires_waiver: None,
                waiver_text: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

        // Different campground entirely
        TaxRule::create(&db.pool, &create_data(Uuid::new_v4(), "Other park"), Uuid::new_v4())
            .await
            .unwrap();

        let active = TaxRule::find_active_exemptions(&db.pool, campground_id)
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, exemption_id);
    }

    #[tokio::test]
    async fn active_exemptions_come_back_in_insertion_order() {
        let db = DBService::new_in_memory().await.unwrap();
        let campground_id = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        TaxRule::create(&db.pool, &create_data(campground_id, "First"), first)
            .await
            .unwrap();
        TaxRule::create(&db.pool, &create_data(campground_id, "Second"), second)
            .await
            .unwrap();

        let active = TaxRule::find_active_exemptions(&db.pool, campground_id)
            .await
            .unwrap();
        let ids: Vec<Uuid> = active.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn delete_reports_rows_affected() {
        let db = DBService::new_in_memory().await.unwrap();
        let rule_id = Uuid::new_v4();
        TaxRule::create(&db.pool, &create_data(Uuid::new_v4(), "Monthly"), rule_id)
            .await
            .unwrap();

        assert_eq!(TaxRule::delete(&db.pool, rule_id).await.unwrap(), 1);
        assert_eq!(TaxRule::delete(&db.pool, rule_id).await.unwrap(), 0);
    }
}
