//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types stay free of HTTP concerns; every response is mapped into
//! a DTO here. Identifiers serialize as plain UUID strings.

pub mod group_dto;
pub mod pair_dto;
pub mod participant_dto;
pub mod round_dto;

pub use group_dto::*;
pub use pair_dto::*;
pub use participant_dto::*;
pub use round_dto::*;
