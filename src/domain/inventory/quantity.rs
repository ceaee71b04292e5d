use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while reading an amount such as `"2 kg"`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("{message}")]
    UnsupportedUnit { unit: String, message: String },
}

/// What a unit measures; conversions never cross dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Weight,
    Volume,
    Count,
}

/// Supported measurement units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
}

/// Accepted spellings after lower-casing and stripping trailing 's'
const ALIASES: &[(&str, Unit)] = &[
    ("g", Unit::Gram),
    ("gram", Unit::Gram),
    ("gramme", Unit::Gram),
    ("kg", Unit::Kilogram),
    ("kilo", Unit::Kilogram),
    ("kilogram", Unit::Kilogram),
    ("kilogramme", Unit::Kilogram),
    ("ml", Unit::Milliliter),
    ("milliliter", Unit::Milliliter),
    ("millilitre", Unit::Milliliter),
    ("l", Unit::Liter),
    ("liter", Unit::Liter),
    ("litre", Unit::Liter),
    ("piece", Unit::Piece),
    ("pc", Unit::Piece),
    ("whole", Unit::Piece),
];

impl Unit {
    /// Parses a unit word, e.g. `"Kilos"` or `"pcs"`
    pub fn parse(raw: &str) -> Result<Unit, QuantityError> {
        let lowered = raw.trim().to_lowercase();
        let normalized = lowered.trim_end_matches('s');

        if let Some((_, unit)) = ALIASES.iter().find(|(alias, _)| *alias == normalized) {
            return Ok(*unit);
        }

        let similar: Vec<&str> = ALIASES
            .iter()
            .map(|(alias, _)| *alias)
            .filter(|alias| {
                !normalized.is_empty() && (normalized.contains(alias) || alias.contains(normalized))
            })
            .collect();

        let message = if similar.is_empty() {
            "Unsupported unit. Supported units are: g, kg, ml, l, piece".to_string()
        } else {
            format!("Did you mean: {}?", similar.join(", "))
        };

        Err(QuantityError::UnsupportedUnit {
            unit: raw.trim().to_string(),
            message,
        })
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Gram | Unit::Kilogram => Dimension::Weight,
            Unit::Milliliter | Unit::Liter => Dimension::Volume,
            Unit::Piece => Dimension::Count,
        }
    }

    /// Multiplier to the dimension's base unit (grams, millilitres, pieces)
    fn factor(&self) -> f64 {
        match self {
            Unit::Kilogram | Unit::Liter => 1000.0,
            Unit::Gram | Unit::Milliliter | Unit::Piece => 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Piece => "piece",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

fn compact_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)([a-zA-Z]+)$").expect("static regex"))
}

impl Quantity {
    /// Parses `"5"`, `"500g"` or `"2 kg"`
    ///
    /// A bare number counts pieces.
    ///
    /// # Example
    /// ```
    /// use cooking_assistant_api::domain::inventory::quantity::{Quantity, Unit};
    ///
    /// let q = Quantity::parse("500g").unwrap();
    /// assert_eq!(q.value, 500.0);
    /// assert_eq!(q.unit, Unit::Gram);
    /// ```
    pub fn parse(text: &str) -> Result<Quantity, QuantityError> {
        let text = text.trim();
        let invalid = || QuantityError::InvalidFormat(text.to_string());

        if let Ok(value) = text.parse::<f64>() {
            return Self::checked(value, Unit::Piece).ok_or_else(invalid);
        }

        if let Some(caps) = compact_amount().captures(text) {
            let value: f64 = caps[1].parse().map_err(|_| invalid())?;
            let unit = Unit::parse(&caps[2])?;
            return Self::checked(value, unit).ok_or_else(invalid);
        }

        let parts: Vec<&str> = text.split_whitespace().collect();
        if let [number, unit] = parts.as_slice() {
            if let Ok(value) = number.parse::<f64>() {
                let unit = Unit::parse(unit)?;
                return Self::checked(value, unit).ok_or_else(invalid);
            }
        }

        Err(invalid())
    }

    fn checked(value: f64, unit: Unit) -> Option<Quantity> {
        (value.is_finite() && value >= 0.0).then_some(Quantity { value, unit })
    }

    /// Value expressed in `target`, or `None` across dimensions
    pub fn convert_to(&self, target: Unit) -> Option<f64> {
        if self.unit.dimension() != target.dimension() {
            return None;
        }
        Some(self.value * self.unit.factor() / target.factor())
    }
}

/// Formats a value for storage and display, e.g. `2.5 kg` or `3 pieces`
pub fn format_quantity(value: f64, unit: Unit) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let number = if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    };

    let label = match unit {
        Unit::Piece if rounded != 1.0 => "pieces",
        other => other.symbol(),
    };

    format!("{} {}", number, label)
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_quantity(self.value, self.unit))
    }
}
