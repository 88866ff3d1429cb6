#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Animated scenes and scroll-driven activation for the Alt Energy Labs site.
//!
//! Everything outside `wasm` is plain Rust so it runs and tests on the host; the
//! browser bindings are only compiled for wasm32.

pub mod affordance;
pub mod binder;
pub mod camera;
pub mod config;
pub mod countdown;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod scenes;
pub mod surface;
pub mod visibility;

pub use error::SiteError;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount_site, unmount_site};
