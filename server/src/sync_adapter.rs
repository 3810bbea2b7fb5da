//! Adapter for the durable sync event log.
//!
//! The log is append-only: writers insert, readers range-scan by tenant
//! and timestamp. No locking is required beyond what the backing store
//! provides for those two operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A durable record that an entity changed, used to invalidate caches in
/// other processes.
///
/// `reload_required` signals that the client application, not just the
/// server cache, must reload (e.g. a rendering-mode change).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEvent {
	pub tn_id: TnId,
	pub entity_name: Box<str>,
	pub entity_id: u32,
	pub modified_on: Timestamp,
	pub reload_required: bool,
}

#[async_trait]
pub trait SyncAdapter: Debug + Send + Sync {
	async fn append_event(&self, event: &SyncEvent) -> TsResult<()>;
	/// Events for the tenant strictly newer than `since`
	async fn events_since(&self, tn_id: TnId, since: Timestamp) -> TsResult<Vec<SyncEvent>>;
	/// Drops events older than `cutoff`, returns the number removed
	async fn prune(&self, cutoff: Timestamp) -> TsResult<usize>;
}

// vim: ts=4
