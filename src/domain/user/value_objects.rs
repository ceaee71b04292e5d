use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use cooking_assistant_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("cook@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "cook@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into().trim().to_string();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.len() >= 3
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WhatsApp phone number in E.164 form
///
/// # Invariants
/// - Starts with '+'
/// - Followed by 8 to 15 ASCII digits
/// - Never carries the gateway's `whatsapp:` channel prefix
///
/// # Example
/// ```
/// use cooking_assistant_api::domain::user::value_objects::PhoneNumber;
///
/// let phone = PhoneNumber::parse("whatsapp:+14155550123").expect("valid number");
/// assert_eq!(phone.as_str(), "+14155550123");
/// assert_eq!(phone.last_four(), "0123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const CHANNEL_PREFIX: &'static str = "whatsapp:";

    /// Parses a number as delivered by the gateway (`whatsapp:+1...`) or bare
    pub fn parse(raw: &str) -> Result<Self, String> {
        let number: String = raw
            .trim()
            .trim_start_matches(Self::CHANNEL_PREFIX)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let digits = number
            .strip_prefix('+')
            .ok_or_else(|| format!("Phone number must start with '+': {}", raw))?;

        if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid phone number: {}", raw));
        }

        Ok(PhoneNumber(number))
    }

    /// Returns the number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits, used when minting user ids
    pub fn last_four(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }

    /// Address in the gateway's WhatsApp channel form
    pub fn to_channel_address(&self) -> String {
        format!("{}{}", Self::CHANNEL_PREFIX, self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PhoneNumber::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persona the assistant speaks with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChefPersonality {
    Funny,
    Direct,
    #[default]
    Warm,
    Informative,
}

impl ChefPersonality {
    pub const ALL: [ChefPersonality; 4] = [
        ChefPersonality::Funny,
        ChefPersonality::Direct,
        ChefPersonality::Warm,
        ChefPersonality::Informative,
    ];

    /// Stored key, as used in preferences and the `/chef` command
    pub fn key(&self) -> &'static str {
        match self {
            ChefPersonality::Funny => "funny",
            ChefPersonality::Direct => "direct",
            ChefPersonality::Warm => "warm",
            ChefPersonality::Informative => "informative",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChefPersonality::Funny => "Chef Chuckles",
            ChefPersonality::Direct => "Chef Precision",
            ChefPersonality::Warm => "Chef Comfort",
            ChefPersonality::Informative => "Chef Knowledge",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChefPersonality::Funny => "A witty and humorous chef who makes cooking fun",
            ChefPersonality::Direct => "A straightforward and efficient chef focused on results",
            ChefPersonality::Warm => {
                "A nurturing and encouraging chef who makes cooking feel like home"
            }
            ChefPersonality::Informative => {
                "A detail-oriented chef who shares cooking science and techniques"
            }
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            ChefPersonality::Funny => {
                "You are Chef Chuckles, a witty and humorous cooking assistant. You make jokes \
                 while giving cooking advice and keep the conversation light and fun."
            }
            ChefPersonality::Direct => {
                "You are Chef Precision, a direct and efficient cooking assistant. You provide \
                 clear, concise instructions and focus on getting the best results."
            }
            ChefPersonality::Warm => {
                "You are Chef Comfort, a warm and nurturing cooking assistant. You provide \
                 encouragement and make cooking feel like a cozy experience."
            }
            ChefPersonality::Informative => {
                "You are Chef Knowledge, an informative cooking assistant who shares detailed \
                 explanations about cooking techniques, food science, and culinary history."
            }
        }
    }
}

impl FromStr for ChefPersonality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChefPersonality::ALL
            .into_iter()
            .find(|p| p.key() == wanted || p.display_name().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown chef personality: {}", s.trim()))
    }
}

impl fmt::Display for ChefPersonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn valid_email_minimum_length() {
        assert!(Email::new("a@b").is_ok());
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        assert!(Email::new("").is_err());
    }

    #[test]
    fn email_deserialization_validates() {
        let ok: Result<Email, _> = serde_json::from_str("\"cook@example.com\"");
        let bad: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(ok.is_ok());
        assert!(bad.is_err());
    }

    #[test]
    fn phone_strips_channel_prefix() {
        let phone = PhoneNumber::parse("whatsapp:+14155550123").unwrap();
        assert_eq!(phone.as_str(), "+14155550123");
        assert_eq!(phone.to_channel_address(), "whatsapp:+14155550123");
    }

    #[test]
    fn phone_ignores_inner_whitespace() {
        let phone = PhoneNumber::parse(" +44 7700 900123 ").unwrap();
        assert_eq!(phone.as_str(), "+447700900123");
    }

    #[test]
    fn phone_requires_plus() {
        assert!(PhoneNumber::parse("14155550123").is_err());
    }

    #[test]
    fn phone_rejects_letters_and_bad_lengths() {
        assert!(PhoneNumber::parse("+1415abc0123").is_err());
        assert!(PhoneNumber::parse("+1234567").is_err());
        assert!(PhoneNumber::parse("+1234567890123456").is_err());
    }

    #[test]
    fn phone_last_four() {
        let phone = PhoneNumber::parse("+919876543210").unwrap();
        assert_eq!(phone.last_four(), "3210");
    }

    #[test]
    fn personality_from_key_or_name() {
        assert_eq!("funny".parse::<ChefPersonality>(), Ok(ChefPersonality::Funny));
        assert_eq!(" DIRECT ".parse::<ChefPersonality>(), Ok(ChefPersonality::Direct));
        assert_eq!(
            "Chef Knowledge".parse::<ChefPersonality>(),
            Ok(ChefPersonality::Informative)
        );
        assert!("grumpy".parse::<ChefPersonality>().is_err());
    }

    #[test]
    fn personality_serializes_lowercase() {
        let json = serde_json::to_string(&ChefPersonality::Warm).unwrap();
        assert_eq!(json, "\"warm\"");
        assert_eq!(ChefPersonality::default(), ChefPersonality::Warm);
    }
}
