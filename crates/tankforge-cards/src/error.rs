//! Error types for the card layer.

/// Errors that can occur while configuring or drawing packs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    /// The shared inventory is exhausted. Sent verbatim to the client.
    #[error("no packs remaining")]
    NoPacksRemaining,

    /// A pack cannot hold more distinct cards than the catalog has.
    #[error("pack size {pack_size} exceeds catalog size {catalog_size}")]
    PackLargerThanCatalog {
        pack_size: usize,
        catalog_size: usize,
    },

    /// Packs must contain at least one card.
    #[error("pack size must be at least 1")]
    EmptyPack,
}
