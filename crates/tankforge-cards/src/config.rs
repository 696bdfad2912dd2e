//! Pack configuration.

use crate::CardError;

/// How many packs exist and how many cards each one holds.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Packs available for the lifetime of the server. Never restocked.
    pub inventory: u32,

    /// Distinct cards per pack.
    pub pack_size: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            inventory: 10,
            pack_size: 5,
        }
    }
}

impl PackConfig {
    /// Checks the config against the catalog it will draw from.
    pub fn validate(&self, catalog_size: usize) -> Result<(), CardError> {
        if self.pack_size == 0 {
            return Err(CardError::EmptyPack);
        }
        if self.pack_size > catalog_size {
            return Err(CardError::PackLargerThanCatalog {
                pack_size: self.pack_size,
                catalog_size,
            });
        }
        Ok(())
    }
}
