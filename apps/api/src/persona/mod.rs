//! Persona registry. Maps an arbitrary selector label to one of the two expert personas.
//!
//! Resolution never fails: unknown, blank or garbled input falls back to the
//! first-listed persona. The table is built once at startup and only read afterwards,
//! so it is shared across requests without synchronisation.

use serde::{Deserialize, Serialize};

pub mod handlers;
pub mod prompts;

use prompts::{DATA_SCIENTIST_SYSTEM, STRATEGY_CONSULTANT_SYSTEM};

/// The two selectable expert modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonaSelector {
    /// Business and strategy consultant.
    #[default]
    A,
    /// Data analysis and machine-learning specialist.
    B,
}

impl PersonaSelector {
    pub const ALL: [PersonaSelector; 2] = [PersonaSelector::A, PersonaSelector::B];

    /// The short code shown on the selector control.
    pub fn code(self) -> &'static str {
        match self {
            PersonaSelector::A => "A",
            PersonaSelector::B => "B",
        }
    }

    fn index(self) -> usize {
        match self {
            PersonaSelector::A => 0,
            PersonaSelector::B => 1,
        }
    }
}

/// A single persona entry: code, human label and the system instruction sent to the model.
#[derive(Debug, Clone, Serialize)]
pub struct Persona {
    pub selector: PersonaSelector,
    pub display_name: &'static str,
    /// Alternate labels a front-end may submit instead of the raw code.
    pub aliases: Vec<&'static str>,
    pub instruction: &'static str,
}

/// Fixed selector → persona table.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: [Persona; 2],
}

impl PersonaRegistry {
    /// The built-in table. Persona A is listed first and is the fallback.
    pub fn builtin() -> Self {
        Self {
            personas: [
                Persona {
                    selector: PersonaSelector::A,
                    display_name: "Business & Strategy Consultant",
                    aliases: vec!["Business Strategy", "経営・事業戦略の専門家"],
                    instruction: STRATEGY_CONSULTANT_SYSTEM,
                },
                Persona {
                    selector: PersonaSelector::B,
                    display_name: "Data Scientist",
                    aliases: vec!["Data Analysis & Machine Learning", "データ分析・機械学習の専門家"],
                    instruction: DATA_SCIENTIST_SYSTEM,
                },
            ],
        }
    }

    /// All personas in display order.
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn default_selector(&self) -> PersonaSelector {
        self.personas[0].selector
    }

    pub fn persona(&self, selector: PersonaSelector) -> &Persona {
        &self.personas[selector.index()]
    }

    /// Normalizes free-form selector input.
    ///
    /// Order: trimmed upper-cased code, then display name / alias (case-insensitive),
    /// then the default persona.
    pub fn normalize(&self, input: &str) -> PersonaSelector {
        let key = input.trim().to_uppercase();
        if key.is_empty() {
            return self.default_selector();
        }

        if let Some(selector) = PersonaSelector::ALL.iter().find(|s| s.code() == key) {
            return *selector;
        }

        self.personas
            .iter()
            .find(|p| {
                p.display_name.to_uppercase() == key
                    || p.aliases.iter().any(|a| a.to_uppercase() == key)
            })
            .map(|p| p.selector)
            .unwrap_or_else(|| self.default_selector())
    }

    /// Resolves any selector input to a persona. Never fails.
    pub fn resolve(&self, input: &str) -> &Persona {
        self.persona(self.normalize(input))
    }

    /// Strict lookup by code only; no alias matching and no fallback.
    pub fn get(&self, code: &str) -> Option<&Persona> {
        let key = code.trim().to_uppercase();
        PersonaSelector::ALL
            .iter()
            .find(|s| s.code() == key)
            .map(|s| self.persona(*s))
    }
}
