//! The card catalog: every tank a pack can contain.
//!
//! Templates are grouped by weight class and never mutated. Drawing copies
//! a template and stamps the new owner on the copy.

use std::fmt;

use tankforge_protocol::{SERVER_OWNER, Tank};

/// Weight class of a tank. Heavier tiers are rarer in the standard catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Light,
    Medium,
    Heavy,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "Light"),
            Self::Medium => write!(f, "Medium"),
            Self::Heavy => write!(f, "Heavy"),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub tier: Tier,
    pub card: Tank,
}

/// (model, health, attack, copies)
type Row = (&'static str, i32, i32, usize);

const LIGHT: &[Row] = &[
    ("M22", 50, 10, 3),
    ("FIAT6614", 55, 12, 3),
    ("BMP", 60, 15, 3),
    ("Fox", 52, 11, 3),
    ("AMX13", 58, 14, 3),
];

const MEDIUM: &[Row] = &[
    ("Sherman", 100, 28, 2),
    ("T-34", 110, 27, 2),
    ("Panther", 120, 25, 2),
    ("M47", 115, 30, 2),
];

const HEAVY: &[Row] = &[
    ("Tiger II", 200, 53, 1),
    ("IS-6", 220, 55, 1),
    ("M26 Pershing", 210, 52, 1),
    ("T-10M", 230, 58, 1),
    ("KV-2", 250, 50, 1),
    ("Maus", 280, 57, 1),
    ("M26E5", 240, 54, 1),
];

/// Immutable, ordered list of card templates.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    /// Builds a catalog from explicit templates.
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// The standard 30-card catalog: 15 light, 8 medium, 7 heavy.
    ///
    /// Light and medium models appear more than once; each copy is a
    /// separate entry, so a pack can hold two tanks of the same model.
    pub fn standard() -> Self {
        let tiers = [
            (Tier::Light, LIGHT),
            (Tier::Medium, MEDIUM),
            (Tier::Heavy, HEAVY),
        ];
        let mut templates = Vec::new();
        for (tier, rows) in tiers {
            for &(model, health, attack, copies) in rows {
                let card = Tank::new(
                    format!("{model} ({tier})"),
                    SERVER_OWNER,
                    health,
                    attack,
                );
                templates.extend(
                    std::iter::repeat_n(Template { tier, card }, copies),
                );
            }
        }
        Self { templates }
    }

    /// Returns the template at `index`.
    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    /// Iterates over the templates of one tier.
    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &Template> {
        self.templates.iter().filter(move |t| t.tier == tier)
    }

    /// Number of templates (copies counted separately).
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_tier_counts() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 30);
        assert_eq!(catalog.tier(Tier::Light).count(), 15);
        assert_eq!(catalog.tier(Tier::Medium).count(), 8);
        assert_eq!(catalog.tier(Tier::Heavy).count(), 7);
    }

    #[test]
    fn test_standard_catalog_templates_are_server_owned() {
        let catalog = Catalog::standard();
        assert!(
            catalog
                .tier(Tier::Heavy)
                .all(|t| t.card.owner == SERVER_OWNER)
        );
    }

    #[test]
    fn test_standard_catalog_model_names_carry_tier() {
        let catalog = Catalog::standard();
        let sherman = catalog
            .tier(Tier::Medium)
            .find(|t| t.card.model.starts_with("Sherman"))
            .expect("Sherman is in the catalog");

        assert_eq!(sherman.card.model, "Sherman (Medium)");
        assert_eq!(sherman.card.health, 100);
        assert_eq!(sherman.card.attack, 28);
    }
}
