//! Decision Types
//!
//! Verdict types shared by the engine and callers.

use serde::{Deserialize, Serialize};

/// Binary scoring outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Legitimate,
    Fraudulent,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Legitimate => "legitimate",
            Decision::Fraudulent => "fraudulent",
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, Decision::Fraudulent)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one scoring call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    /// P(fraud), present only when the model produced a probability
    pub risk_score: Option<f64>,
}

impl Verdict {
    pub fn legitimate(risk_score: Option<f64>) -> Self {
        Self { decision: Decision::Legitimate, risk_score }
    }

    pub fn fraudulent(risk_score: Option<f64>) -> Self {
        Self { decision: Decision::Fraudulent, risk_score }
    }

    pub fn is_fraud(&self) -> bool {
        self.decision.is_fraud()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.risk_score {
            Some(p) => write!(f, "{} (risk score: {:.2})", self.decision, p),
            None => write!(f, "{}", self.decision),
        }
    }
}
