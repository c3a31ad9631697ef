//! Session HTTP client for the EduTrack course-management API.
//!
//! The backend uses cookie-based SPA authentication guarded by an
//! anti-forgery token: a `GET /sanctum/csrf-cookie` call sets an
//! `XSRF-TOKEN` cookie whose decoded value must be echoed in the
//! `X-XSRF-TOKEN` header of every state-changing request. An expired or
//! mismatched token is answered with HTTP 419.
//!
//! [`SessionClient`] owns that protocol:
//!
//! * every request carries the cookie jar, `Accept: application/json` and
//!   `X-Requested-With: XMLHttpRequest`
//! * mutating requests (POST/PUT/PATCH/DELETE) are preceded by a priming call
//!   according to the client's [`PrimingPolicy`], and carry the token header
//! * a 419 answer triggers exactly one re-prime and resubmission
//!
//! The endpoint facades in [`api`] build [`RequestDescriptor`]s and decode the
//! payloads defined in `edutrack-protocol`.
//!
//! # Example
//!
//! ```ignore
//! use edutrack::{ClientConfig, SessionClient};
//! use edutrack_protocol::Credentials;
//!
//! let client = SessionClient::new(ClientConfig::from_env()?)?;
//! client.auth().login(&Credentials::new("ada@uni.edu", "secret")).await?;
//! let mine = client.enrollments().mine().await?;
//! ```

pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, PrimingPolicy};
pub use credential::{CookieJar, CredentialStore, MemoryCredentialStore};
pub use error::{Error, Result};
pub use request::{Attempt, FilePart, FormPart, Multipart, PartValue, RequestBody, RequestDescriptor};
pub use response::Response;
pub use session::SessionClient;
pub use transport::{HttpTransport, OutgoingRequest, Transport};

/// Re-exported so callers can name methods without depending on `reqwest`.
pub use reqwest::Method;
