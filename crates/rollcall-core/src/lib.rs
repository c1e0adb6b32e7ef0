//! Core types and trait definitions for Rollcall.
//!
//! Holds the data model, the [`store::AttendanceStore`] abstraction and the
//! client-side attendance workflow (session tracking, scan resolution). No
//! HTTP or database code lives here.

// Trait methods are native `async fn`; `Send` is spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod demo;
pub mod error;
pub mod model;
pub mod notice;
pub mod scan;
pub mod session;
pub mod store;

pub use error::{Error, Result};
