//! Cross-process cache invalidation.
//!
//! Every write path records a sync event in the durable log; any process
//! holding a cache asks for events newer than its last watermark before
//! trusting that cache. Coherence is eventual within one polling
//! interval, enforced by the watermark protocol rather than distributed
//! locks. Duplicate events are harmless: consumers only care whether
//! something newer than their watermark exists.

use serde::Serialize;
use std::sync::Arc;

use crate::prelude::*;
use crate::sync_adapter::{SyncAdapter, SyncEvent};

/// Default retention: one day covers any plausible polling interval
pub const DEFAULT_RETENTION_SECS: i64 = 24 * 60 * 60;

/// Response of a watermark poll: the events plus the new watermark the
/// caller should remember
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sync {
	pub sync_date: Timestamp,
	pub sync_events: Vec<SyncEvent>,
}

#[derive(Clone, Debug)]
pub struct SyncManager {
	adapter: Arc<dyn SyncAdapter>,
}

impl SyncManager {
	pub fn new(adapter: Arc<dyn SyncAdapter>) -> Self {
		Self { adapter }
	}

	/// Appends an event with the current timestamp
	pub async fn add_event(
		&self,
		tn_id: TnId,
		entity_name: &str,
		entity_id: u32,
		reload_required: bool,
	) -> TsResult<()> {
		let event = SyncEvent {
			tn_id,
			entity_name: entity_name.into(),
			entity_id,
			modified_on: Timestamp::now(),
			reload_required,
		};
		debug!("Sync event: tn_id={} {}:{}", tn_id, entity_name, entity_id);
		self.adapter.append_event(&event).await
	}

	/// Events for the tenant strictly newer than `since`, with the
	/// caller's next watermark.
	///
	/// Timestamps are second-granular, so the watermark backs off one
	/// second: an event appended in the poll's own second is redelivered
	/// on the next poll instead of being lost.
	pub async fn events_since(&self, tn_id: TnId, since: Timestamp) -> TsResult<Sync> {
		let sync_date = Timestamp::now().add_seconds(-1);
		let sync_events = self.adapter.events_since(tn_id, since).await?;
		Ok(Sync { sync_date, sync_events })
	}

	/// Consumer-side check: is there an event newer than `since` for any
	/// of the given entity names?
	pub async fn has_events_since(
		&self,
		tn_id: TnId,
		entity_names: &[&str],
		since: Timestamp,
	) -> TsResult<bool> {
		let events = self.adapter.events_since(tn_id, since).await?;
		Ok(events.iter().any(|ev| entity_names.contains(&ev.entity_name.as_ref())))
	}

	/// Housekeeping: drops events past the retention window
	pub async fn prune(&self, retention_secs: i64) -> TsResult<usize> {
		let cutoff = Timestamp::now().add_seconds(-retention_secs);
		let removed = self.adapter.prune(cutoff).await?;
		if removed > 0 {
			info!("Pruned {} sync events older than {}", removed, cutoff);
		}
		Ok(removed)
	}
}


// vim: ts=4
