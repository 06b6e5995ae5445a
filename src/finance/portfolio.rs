use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{percentage, total};
use crate::database::models::{Investment, InvestmentType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentShare {
    #[serde(rename = "type")]
    pub kind: InvestmentType,
    pub total: Decimal,
    pub percentage: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub total: Decimal,
    /// Only types that hold something, in [`InvestmentType::ALL`] order.
    pub by_type: Vec<InvestmentShare>,
}

pub fn portfolio(investments: &[Investment]) -> Portfolio {
    let grand_total = total(investments.iter().map(|i| i.amount));
    let by_type = InvestmentType::ALL
        .iter()
        .filter_map(|kind| {
            let mut holdings = investments.iter().filter(|i| i.kind == *kind).peekable();
            holdings.peek()?;
            let sum = total(holdings.map(|i| i.amount));
            Some(InvestmentShare {
                kind: *kind,
                total: sum,
                percentage: percentage(sum, grand_total),
            })
        })
        .collect();

    Portfolio {
        total: grand_total,
        by_type,
    }
}
