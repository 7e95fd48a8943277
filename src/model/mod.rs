pub mod ids;
pub mod phone;
pub mod address_type;
pub mod address;
pub mod contact;
pub mod group;

// Re-exports for convenience
pub use ids::Id;
pub use address_type::AddressTypeKind;
pub use address::Address;
pub use contact::Contact;
pub use group::Group;
