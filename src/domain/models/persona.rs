use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Behavioural framing attached to every outbound request as the system
/// message. The set is fixed; prompts are not user-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    General,
    CreativeWriting,
    Programming,
    DataAnalysis,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::General,
        Persona::CreativeWriting,
        Persona::Programming,
        Persona::DataAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::General => "general",
            Persona::CreativeWriting => "creative",
            Persona::Programming => "programming",
            Persona::DataAnalysis => "data",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::General => "General assistant",
            Persona::CreativeWriting => "Creative-writing assistant",
            Persona::Programming => "Programming assistant",
            Persona::DataAnalysis => "Data-analysis assistant",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::General => {
                "You are a general-purpose AI assistant. Please answer the user's questions."
            }
            Persona::CreativeWriting => {
                "You are an AI assistant focused on creative writing, skilled at producing imaginative content."
            }
            Persona::Programming => {
                "You are a programming AI assistant, focused on providing code and technical solutions."
            }
            Persona::DataAnalysis => {
                "You are a data-analysis AI assistant, skilled at explaining data and offering analytical insights."
            }
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Persona {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "general" | "general-assistant" | "assistant" => Ok(Persona::General),
            "creative" | "creative-writing" | "writing" => Ok(Persona::CreativeWriting),
            "programming" | "code" | "coding" => Ok(Persona::Programming),
            "data" | "data-analysis" | "analysis" => Ok(Persona::DataAnalysis),
            unknown => Err(DomainError::invalid_input(format!(
                "unknown persona '{}' (expected one of: general, creative, programming, data)",
                unknown
            ))),
        }
    }
}
