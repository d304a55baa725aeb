//! Commission rule configuration submitted by the partner

use crate::validation::{ValidationError, validators};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

/// Kind of transaction a rule pays commission on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Property,
    Loan,
    Insurance,
    Installment,
}

impl TransactionType {
    pub const ALL: [Self; 4] = [
        Self::Property,
        Self::Loan,
        Self::Insurance,
        Self::Installment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Loan => "loan",
            Self::Insurance => "insurance",
            Self::Installment => "installment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    #[default]
    Percentage,
    Fixed,
}

/// How an agent earns commission on one transaction type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRule {
    pub transaction_type: TransactionType,

    #[serde(default)]
    pub commission_type: CommissionType,

    pub value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_transaction_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_commission: Option<f64>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl CommissionRule {
    /// A disabled zero-value rule, used to pre-fill an empty form
    pub fn blank(transaction_type: TransactionType) -> Self {
        Self {
            transaction_type,
            commission_type: CommissionType::Percentage,
            value: 0.0,
            min_transaction_amount: None,
            max_commission: None,
            enabled: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let field = |name: &str| format!("{} {name}", self.transaction_type.as_str());

        match self.commission_type {
            CommissionType::Percentage => {
                validators::validate_amount_at_most(self.value, 100.0, &field("commission"))?;
            }
            CommissionType::Fixed => validators::validate_amount(self.value, &field("commission"))?,
        }
        if let Some(min) = self.min_transaction_amount {
            validators::validate_amount(min, &field("minimum transaction amount"))?;
        }
        if let Some(max) = self.max_commission {
            validators::validate_amount(max, &field("maximum commission"))?;
        }
        Ok(())
    }
}

/// The full configuration posted to create/update endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionConfig {
    #[serde(default)]
    pub rules: Vec<CommissionRule>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl CommissionConfig {
    /// One blank rule per transaction type
    pub fn blank() -> Self {
        Self {
            rules: TransactionType::ALL
                .into_iter()
                .map(CommissionRule::blank)
                .collect(),
            extra: Map::new(),
        }
    }

    pub fn rule(&self, transaction_type: TransactionType) -> Option<&CommissionRule> {
        self.rules
            .iter()
            .find(|rule| rule.transaction_type == transaction_type)
    }

    /// Insert or replace the rule for its transaction type
    pub fn upsert(&mut self, rule: CommissionRule) {
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.transaction_type == rule.transaction_type)
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.transaction_type) {
                return Err(ValidationError::Duplicate {
                    field: format!("{} rule", rule.transaction_type.as_str()),
                });
            }
            rule.validate()?;
        }
        Ok(())
    }
}
