//! User domain - mapping public identities to transport identifiers

pub mod resolver;

pub use resolver::IdentityResolver;
