//! Wire types for the EduTrack course-management API.
//!
//! This crate contains the serde-serializable types exchanged with the
//! backend as JSON. These types represent the "protocol layer": the shapes of
//! data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: behavior is limited to small list helpers the pages need
//!   (searching, grouping, pagination checks)
//! * Lenient: unknown fields are preserved in `extra`, missing optional fields
//!   default, so backend additions never break decoding
//!
//! The HTTP session, anti-forgery handling and endpoint facades live in the
//! `edutrack` client crate.

pub mod achievement;
pub mod admin;
pub mod cookie;
pub mod course;
pub mod enrollment;
pub mod envelope;
pub mod message;
pub mod results;
pub mod user;

pub use achievement::*;
pub use admin::*;
pub use cookie::*;
pub use course::*;
pub use enrollment::*;
pub use envelope::*;
pub use message::*;
pub use results::*;
pub use user::*;
