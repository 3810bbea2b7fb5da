//! Tessera is a multi-tenant content platform engine.
//!
//! Many public host names ("aliases") map onto a smaller set of logical
//! sites, each site composed of a tree of pages hosting placed module
//! instances, all gated by a permission model, with in-memory caches
//! kept coherent across server processes through a sync event log.
//!
//! # Request flow
//!
//! - [`core::request::RequestCtx::resolve`] maps host+path to an alias
//!   and binds the caller's tenant
//! - [`site::SiteService::get_site_view`] pulls pages, modules, settings
//!   and languages, filters each by the caller's permissions and orders
//!   pages into a tree
//! - [`sync::SyncManager`] records every write so other processes drop
//!   their caches within one polling interval
//!
//! Persistence is injected through the adapter traits in
//! [`master_adapter`], [`meta_adapter`] and [`sync_adapter`]; the engine
//! itself performs no I/O beyond those.

#![forbid(unsafe_code)]

pub mod alias;
pub mod core;
pub mod error;
pub mod master_adapter;
pub mod meta_adapter;
pub mod page;
pub mod perm;
pub mod prelude;
pub mod site;
pub mod sync;
pub mod sync_adapter;
pub mod types;

pub use crate::core::app::{App, AppBuilder, AppState};

// vim: ts=4
