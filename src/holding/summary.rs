//! Plain-text overview of a holding for the orchestrator.

use std::fmt;

use serde::Serialize;

use super::multiset::Holding;
use crate::cards::{CardRegistry, CardTypeId};

/// One card type in a holding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HoldingRow {
    pub card: CardTypeId,
    pub name: String,
    pub face_value: i64,
    pub count: u32,
    pub max_count: u32,
    pub set_value: i64,
    pub full: bool,
}

/// Rows sorted by face value, set value and name, highest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HoldingSummary {
    pub rows: Vec<HoldingRow>,
}

impl HoldingSummary {
    /// Total copies listed.
    #[must_use]
    pub fn card_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count).sum()
    }
}

impl Holding {
    /// Summarize this holding. Calamities are listed only on request.
    #[must_use]
    pub fn summary(&self, registry: &CardRegistry, include_calamities: bool) -> HoldingSummary {
        let mut rows: Vec<HoldingRow> = self
            .iter()
            .map(|(id, count)| (&registry[id], count))
            .filter(|(card_type, _)| include_calamities || card_type.is_commodity())
            .map(|(card_type, count)| HoldingRow {
                card: card_type.id,
                name: card_type.name.clone(),
                face_value: card_type.face_value,
                count,
                max_count: card_type.max_count,
                set_value: self.set_value(card_type),
                full: count >= card_type.max_count,
            })
            .collect();

        rows.sort_by(|a, b| {
            (b.face_value, b.set_value, &b.name).cmp(&(a.face_value, a.set_value, &a.name))
        });

        HoldingSummary { rows }
    }
}

impl fmt::Display for HoldingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(
                f,
                "{}{:<10}({}): {}/{} cards with a set value of {:>3}",
                if row.full { "*" } else { " " },
                row.name,
                row.face_value,
                row.count,
                row.max_count,
                row.set_value
            )?;
        }
        Ok(())
    }
}
