pub mod address_queries;
pub mod contact_queries;
