use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentType {
    Stocks,
    Crypto,
    RealEstate,
    Bonds,
    Other,
}

impl InvestmentType {
    pub const ALL: [InvestmentType; 5] = [
        Self::Stocks,
        Self::Crypto,
        Self::RealEstate,
        Self::Bonds,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Crypto => "crypto",
            Self::RealEstate => "realestate",
            Self::Bonds => "bonds",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stocks => "Stocks",
            Self::Crypto => "Cryptocurrency",
            Self::RealEstate => "Real Estate",
            Self::Bonds => "Bonds",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InvestmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "stocks" | "stock" => Ok(Self::Stocks),
            "crypto" | "cryptocurrency" => Ok(Self::Crypto),
            "realestate" => Ok(Self::RealEstate),
            "bonds" | "bond" => Ok(Self::Bonds),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown investment type {s:?}")),
        }
    }
}

/// A named holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: InvestmentType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvestment {
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: InvestmentType,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewInvestment {
    pub fn into_row(self, user_id: Uuid, now: DateTime<Utc>) -> Investment {
        Investment {
            id: Uuid::new_v4(),
            user_id,
            name: self.name.trim().to_string(),
            amount: self.amount,
            kind: self.kind,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: Option<InvestmentType>,
    pub description: Option<String>,
}

impl InvestmentPatch {
    pub fn apply(self, i: &mut Investment) {
        if let Some(name) = self.name {
            i.name = name.trim().to_string();
        }
        if let Some(amount) = self.amount {
            i.amount = amount;
        }
        if let Some(kind) = self.kind {
            i.kind = kind;
        }
        if let Some(description) = self.description {
            i.description = Some(description);
        }
    }
}
