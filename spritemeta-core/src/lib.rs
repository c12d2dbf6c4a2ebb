//! Rebuilds sprite import settings (`.meta` files) from sprites extracted out
//! of compiled asset containers.
//!
//! Pipeline: [`source`] objects → [`mesh`] triangle decode → [`transform`]
//! into pixel space → [`meta`] model → [`export`] text.

pub mod config;
pub mod error;
pub mod export;
pub mod guid;
pub mod math;
pub mod mesh;
pub mod meta;
pub mod source;
pub mod transform;

pub use config::ImportOptions;
pub use error::{DecodeError, ResolveError};
pub use meta::{MetaSprite, TextureMeta};
pub use source::{AssetResolver, AssetTable};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
