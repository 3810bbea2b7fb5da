//! App state type

use std::sync::Arc;

use crate::alias::AliasService;
use crate::master_adapter::MasterAdapter;
use crate::meta_adapter::MetaAdapter;
use crate::page::PageService;
use crate::site::SiteService;
use crate::sync::SyncManager;
use crate::sync_adapter::SyncAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared engine state: injected adapters plus the services built on them.
///
/// All caches live inside the services, keyed per tenant/site; there is
/// no ambient static state, so tests can build isolated instances.
pub struct AppState {
	pub master_adapter: Arc<dyn MasterAdapter>,
	pub meta_adapter: Arc<dyn MetaAdapter>,
	pub sync_adapter: Arc<dyn SyncAdapter>,

	pub sync: SyncManager,
	pub aliases: AliasService,
	pub sites: SiteService,
	pub pages: PageService,
}

pub type App = Arc<AppState>;

pub struct Adapters {
	pub master_adapter: Option<Arc<dyn MasterAdapter>>,
	pub meta_adapter: Option<Arc<dyn MetaAdapter>>,
	pub sync_adapter: Option<Arc<dyn SyncAdapter>>,
}

pub struct AppBuilder {
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			adapters: Adapters { master_adapter: None, meta_adapter: None, sync_adapter: None },
		}
	}

	// Adapters
	pub fn master_adapter(&mut self, master_adapter: Arc<dyn MasterAdapter>) -> &mut Self {
		self.adapters.master_adapter = Some(master_adapter);
		self
	}
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.adapters.meta_adapter = Some(meta_adapter);
		self
	}
	pub fn sync_adapter(&mut self, sync_adapter: Arc<dyn SyncAdapter>) -> &mut Self {
		self.adapters.sync_adapter = Some(sync_adapter);
		self
	}

	pub fn build(self) -> App {
		let master_adapter = self.adapters.master_adapter.expect("FATAL: No master adapter");
		let meta_adapter = self.adapters.meta_adapter.expect("FATAL: No meta adapter");
		let sync_adapter = self.adapters.sync_adapter.expect("FATAL: No sync adapter");

		let sync = SyncManager::new(sync_adapter.clone());
		Arc::new(AppState {
			aliases: AliasService::new(master_adapter.clone(), sync.clone()),
			sites: SiteService::new(meta_adapter.clone(), sync.clone()),
			pages: PageService::new(meta_adapter.clone(), sync.clone()),
			sync,
			master_adapter,
			meta_adapter,
			sync_adapter,
		})
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Installs the global tracing subscriber; safe to call more than once
pub fn init_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.try_init();
}

// vim: ts=4
