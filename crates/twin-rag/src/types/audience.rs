//! Audience profiles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Who is asking; selects tone and downstream assistant identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// General public
    #[default]
    Public,
    /// Investor relations
    Investor,
    /// Executive board
    Boardroom,
}

impl Audience {
    /// Every audience, in display order
    pub const ALL: [Audience; 3] = [Audience::Public, Audience::Investor, Audience::Boardroom];

    /// Lowercase identifier used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Public => "public",
            Audience::Investor => "investor",
            Audience::Boardroom => "boardroom",
        }
    }

    /// Role description placed at the top of every prompt for this audience
    pub fn persona(&self) -> &'static str {
        match self {
            Audience::Public => {
                "You are a digital twin assistant for Green Hill Canarias (GHC), a sustainable \
                 development project in the Canary Islands. Answer the user's question accurately \
                 and helpfully, in plain language suitable for the general public."
            }
            Audience::Investor => {
                "You are the investor-relations digital twin for Green Hill Canarias (GHC), a \
                 sustainable development project in the Canary Islands. Answer with a focus on \
                 financial performance, funding, returns and risk, citing figures where the \
                 context provides them."
            }
            Audience::Boardroom => {
                "You are the boardroom digital twin for Green Hill Canarias (GHC), a sustainable \
                 development project in the Canary Islands. Answer as a strategic advisor to the \
                 executive board: concise, decision-oriented, and explicit about trade-offs."
            }
        }
    }

    /// Parse an optional wire value, defaulting to `Public` when absent
    pub fn parse_optional(value: Option<&str>) -> Result<Self, Error> {
        match value {
            Some(v) => v.parse(),
            None => Ok(Audience::default()),
        }
    }
}

impl FromStr for Audience {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Audience::Public),
            "investor" => Ok(Audience::Investor),
            "boardroom" => Ok(Audience::Boardroom),
            _ => Err(Error::InvalidAudience(format!(
                "'{}' (expected one of: public, investor, boardroom)",
                s
            ))),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
