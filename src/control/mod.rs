pub mod drill;
pub mod isomorphism;
pub mod meld;
pub mod repository;
pub mod string;
pub mod validate;
