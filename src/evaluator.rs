//! Password strength analysis - entropy score plus rule-based suggestions.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::blacklist::PasswordBlacklist;
use crate::sections::{
    blacklist_section, digit_section, length_section, lowercase_section, pattern_analysis_section,
    symbol_section, uppercase_section, SectionResult,
};

/// Qualitative label for a 0-4 entropy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => PasswordStrength::Weak,
            2 => PasswordStrength::Fair,
            3 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordAnalysis {
    /// Entropy score, 0 (guessable) to 4 (very unguessable).
    pub score: u8,
    pub strength: PasswordStrength,
    pub warning: Option<String>,
    pub suggestions: Vec<String>,
}

/// Scores passwords with zxcvbn and runs the rule sections independently.
#[derive(Debug, Clone, Default)]
pub struct PasswordAnalyzer {
    blacklist: PasswordBlacklist,
}

impl PasswordAnalyzer {
    pub fn new(blacklist: PasswordBlacklist) -> Self {
        Self { blacklist }
    }

    pub fn analyze(&self, password: &SecretString) -> PasswordAnalysis {
        self.analyze_with_inputs(password, &[])
    }

    /// Like [`analyze`](Self::analyze), penalizing passwords built from
    /// `user_inputs` (name, email fragments).
    pub fn analyze_with_inputs(&self, password: &SecretString, user_inputs: &[&str]) -> PasswordAnalysis {
        let pwd = password.expose_secret();

        // Orchestrator: every section runs, whatever the entropy score says
        let sections: [(&str, SectionResult); 6] = [
            ("length", length_section(password)),
            ("lowercase", lowercase_section(password)),
            ("uppercase", uppercase_section(password)),
            ("digit", digit_section(password)),
            ("symbol", symbol_section(password)),
            ("pattern", pattern_analysis_section(password)),
        ];
        let mut suggestions: Vec<String> = sections
            .into_iter()
            .filter_map(|(_section_name, result)| {
                #[cfg(feature = "tracing")]
                if result.is_some() {
                    tracing::trace!("Password rule not met: {}", _section_name);
                }
                result
            })
            .collect();

        let blacklisted = blacklist_section(password, &self.blacklist);
        let is_blacklisted = blacklisted.is_some();
        suggestions.extend(blacklisted);

        let (mut score, warning) = match zxcvbn::zxcvbn(pwd, user_inputs) {
            Ok(entropy) => {
                let feedback = entropy.feedback().as_ref();
                let warning = feedback
                    .and_then(|f| f.warning())
                    .map(|w| w.to_string())
                    .filter(|w| !w.trim().is_empty());
                if let Some(f) = feedback {
                    for suggestion in f.suggestions() {
                        let text = suggestion.to_string();
                        let text = text.trim();
                        if !text.is_empty() && !suggestions.iter().any(|s| s == text) {
                            suggestions.push(text.to_string());
                        }
                    }
                }
                (entropy.score().min(4), warning)
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Entropy estimator rejected password: {}", _e);
                (0, Some("Password is empty".to_string()))
            }
        };

        if is_blacklisted {
            score = 0;
        }

        PasswordAnalysis {
            score,
            strength: PasswordStrength::from_score(score),
            warning,
            suggestions,
        }
    }
}

/// Analyzes with the built-in blacklist.
pub fn analyze_password(password: &SecretString) -> PasswordAnalysis {
    PasswordAnalyzer::default().analyze(password)
}
