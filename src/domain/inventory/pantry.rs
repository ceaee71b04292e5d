use std::fmt::Write;

use super::kitchen::{InventoryItem, RequestedItem};
use super::quantity::{format_quantity, Quantity, QuantityError};

const EPSILON: f64 = 1e-9;

/// Working copy of a kitchen inventory keyed by normalised ingredient name
///
/// Keys are supplied by the caller (the assistant resolves synonyms and
/// plurals before touching the pantry). When two stored entries share a key
/// the first one is the one requests act on; the others are kept untouched.
///
/// # Example
/// ```
/// use cooking_assistant_api::domain::inventory::{InventoryItem, Pantry, RequestedItem};
///
/// let mut pantry = Pantry::new(vec![("tomato".into(), InventoryItem::new("tomatoes", "2 kg"))]);
/// pantry.add("tomato", &RequestedItem::new("tomatoes", "500g"));
/// assert_eq!(pantry.items()[0].amount, "2.5 kg");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pantry {
    entries: Vec<(String, InventoryItem)>,
}

/// Result of adding one requested item
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added {
        name: String,
        total: String,
        added: String,
    },
    Failed {
        name: String,
        amount: String,
        error: String,
    },
}

/// Result of removing one requested item
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    Removed {
        name: String,
        amount: String,
    },
    Failed {
        name: String,
        error: String,
    },
}

impl Pantry {
    pub fn new(entries: Vec<(String, InventoryItem)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.entries.iter().map(|(_, item)| item.clone()).collect()
    }

    pub fn into_items(self) -> Vec<InventoryItem> {
        self.entries.into_iter().map(|(_, item)| item).collect()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Adds a requested amount, summing into an existing entry when present
    pub fn add(&mut self, key: &str, request: &RequestedItem) -> AddOutcome {
        let failed = |amount: &str, error: String| AddOutcome::Failed {
            name: request.name.clone(),
            amount: amount.to_string(),
            error,
        };

        let added = match Quantity::parse(&request.amount) {
            Ok(q) => q,
            Err(QuantityError::InvalidFormat(_)) => {
                return failed(&request.amount, "Invalid amount format".to_string())
            }
            Err(e) => return failed(&request.amount, e.to_string()),
        };

        let Some(idx) = self.position(key) else {
            let amount = added.to_string();
            self.entries.push((
                key.to_string(),
                InventoryItem::new(request.name.clone(), amount.clone()),
            ));
            return AddOutcome::Added {
                name: request.name.clone(),
                total: amount.clone(),
                added: amount,
            };
        };

        let stored = &mut self.entries[idx].1;
        let current = match Quantity::parse(&stored.amount) {
            Ok(q) => q,
            Err(QuantityError::InvalidFormat(_)) => {
                return failed(&stored.amount, "Invalid amount format".to_string())
            }
            Err(e) => return failed(&stored.amount, format!("Current amount has {}", e)),
        };

        let Some(converted) = added.convert_to(current.unit) else {
            return failed(
                &request.amount,
                format!("Cannot convert between {} and {}", added.unit, current.unit),
            );
        };

        stored.amount = format_quantity(current.value + converted, current.unit);

        AddOutcome::Added {
            name: request.name.clone(),
            total: stored.amount.clone(),
            added: format_quantity(converted, current.unit),
        }
    }

    /// Removes a requested amount
    ///
    /// An amount of `all`, an empty amount, or one that does not parse
    /// removes the whole entry.
    pub fn remove(&mut self, key: &str, request: &RequestedItem) -> RemoveOutcome {
        let Some(idx) = self.position(key) else {
            return RemoveOutcome::Failed {
                name: request.name.clone(),
                error: "Item not found in inventory".to_string(),
            };
        };

        let wanted = request.amount.trim();
        if wanted.is_empty() || wanted.eq_ignore_ascii_case("all") {
            return self.remove_entry(idx);
        }

        let requested = match Quantity::parse(wanted) {
            Ok(q) => q,
            Err(QuantityError::InvalidFormat(_)) => return self.remove_entry(idx),
            Err(e) => {
                return RemoveOutcome::Failed {
                    name: self.entries[idx].1.name.clone(),
                    error: e.to_string(),
                }
            }
        };

        let Ok(current) = Quantity::parse(&self.entries[idx].1.amount) else {
            return self.remove_entry(idx);
        };

        let stored = &mut self.entries[idx].1;
        let Some(converted) = requested.convert_to(current.unit) else {
            return RemoveOutcome::Failed {
                name: stored.name.clone(),
                error: format!(
                    "Cannot convert between {} and {}",
                    requested.unit, current.unit
                ),
            };
        };

        if (current.value - converted).abs() <= EPSILON {
            self.remove_entry(idx)
        } else if converted < current.value {
            stored.amount = format_quantity(current.value - converted, current.unit);
            RemoveOutcome::Removed {
                name: stored.name.clone(),
                amount: format_quantity(converted, current.unit),
            }
        } else {
            RemoveOutcome::Failed {
                name: stored.name.clone(),
                error: "Requested amount exceeds available amount".to_string(),
            }
        }
    }

    /// Empties the pantry, reporting every entry as removed
    pub fn clear(&mut self) -> Vec<RemoveOutcome> {
        self.entries
            .drain(..)
            .map(|(_, item)| RemoveOutcome::Removed {
                name: item.name,
                amount: item.amount,
            })
            .collect()
    }

    fn remove_entry(&mut self, idx: usize) -> RemoveOutcome {
        let (_, item) = self.entries.remove(idx);
        RemoveOutcome::Removed {
            name: item.name,
            amount: item.amount,
        }
    }
}

pub fn has_failures(outcomes: &[AddOutcome]) -> bool {
    outcomes
        .iter()
        .any(|o| matches!(o, AddOutcome::Failed { .. }))
}

/// Chat reply for an inventory update
pub fn render_update_reply(outcomes: &[AddOutcome], total_items: usize) -> String {
    if outcomes.is_empty() {
        return "No new items were added to your inventory.".to_string();
    }

    let failed = has_failures(outcomes);
    let mut reply = if failed {
        "⚠️ Some items couldn't be added to your inventory:\n\n".to_string()
    } else {
        "✅ Updated your kitchen inventory!\n\n".to_string()
    };

    reply.push_str("Items:\n");
    for outcome in outcomes {
        match outcome {
            AddOutcome::Added { name, total, added } => {
                let _ = writeln!(reply, "• {} ({}) [+{}]", name, total, added);
            }
            AddOutcome::Failed {
                name,
                amount,
                error,
            } => {
                let _ = writeln!(reply, "• {} ({}) - {}", name, amount, error);
            }
        }
    }

    if !failed {
        let _ = write!(reply, "\nTotal items in inventory: {}", total_items);
    }

    reply
}

/// Chat reply for an inventory removal
pub fn render_removal_reply(outcomes: &[RemoveOutcome], remaining: usize) -> String {
    if outcomes.is_empty() {
        return "No items were removed from your inventory.".to_string();
    }

    let mut reply = "🗑️ Updated your kitchen inventory!\n\nRemoved items:\n".to_string();
    for outcome in outcomes {
        match outcome {
            RemoveOutcome::Removed { name, amount } => {
                let _ = writeln!(reply, "• {} ({})", name, amount);
            }
            RemoveOutcome::Failed { name, error } => {
                let _ = writeln!(reply, "• {} - {}", name, error);
            }
        }
    }
    let _ = write!(reply, "\nRemaining items: {}", remaining);

    reply
}
