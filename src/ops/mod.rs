pub mod address_ops;
pub mod contact_ops;
pub mod group_ops;

/// What happens to an address left with no linked contacts.
///
/// `Destroy` removes it unconditionally. `KeepStandalone` lets a row that
/// still carries street/phone data survive as a contactless address; a row
/// with no data is removed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    #[default]
    Destroy,
    KeepStandalone,
}
