//! In-memory adapter implementations for integration tests.
//!
//! Read counters let tests assert cache behavior without poking at the
//! caches themselves.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use tessera::master_adapter::{Alias, MasterAdapter, Tenant};
use tessera::meta_adapter::{
	Language, MetaAdapter, Module, Page, PageModule, Permission, Setting, Site,
};
use tessera::perm::{PermissionSet, Principal};
use tessera::prelude::*;
use tessera::sync_adapter::{SyncAdapter, SyncEvent};

/// Common test setup helper
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

#[derive(Debug, Default)]
pub struct InMemoryMasterAdapter {
	pub aliases: RwLock<Vec<Alias>>,
	pub tenants: RwLock<Vec<Tenant>>,
	next_alias_id: AtomicU32,
	pub list_alias_calls: AtomicU32,
}

impl InMemoryMasterAdapter {
	pub fn list_alias_calls(&self) -> u32 {
		self.list_alias_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl MasterAdapter for InMemoryMasterAdapter {
	async fn list_aliases(&self) -> TsResult<Vec<Alias>> {
		self.list_alias_calls.fetch_add(1, Ordering::SeqCst);
		Ok(self.aliases.read().clone())
	}

	async fn read_alias(&self, alias_id: AliasId) -> TsResult<Alias> {
		self.aliases
			.read()
			.iter()
			.find(|a| a.alias_id == alias_id)
			.cloned()
			.ok_or(Error::NotFound)
	}

	async fn create_alias(&self, alias: &Alias) -> TsResult<Alias> {
		let mut alias = alias.clone();
		alias.alias_id = self.next_alias_id.fetch_add(1, Ordering::SeqCst) + 1000;
		self.aliases.write().push(alias.clone());
		Ok(alias)
	}

	async fn update_alias(&self, alias: &Alias) -> TsResult<()> {
		let mut aliases = self.aliases.write();
		let existing =
			aliases.iter_mut().find(|a| a.alias_id == alias.alias_id).ok_or(Error::NotFound)?;
		*existing = alias.clone();
		Ok(())
	}

	async fn delete_alias(&self, alias_id: AliasId) -> TsResult<()> {
		let mut aliases = self.aliases.write();
		let before = aliases.len();
		aliases.retain(|a| a.alias_id != alias_id);
		if aliases.len() == before { Err(Error::NotFound) } else { Ok(()) }
	}

	async fn read_tenant(&self, tn_id: TnId) -> TsResult<Tenant> {
		self.tenants.read().iter().find(|t| t.tn_id == tn_id).cloned().ok_or(Error::NotFound)
	}

	async fn list_tenants(&self) -> TsResult<Vec<Tenant>> {
		Ok(self.tenants.read().clone())
	}
}

#[derive(Debug, Default)]
pub struct InMemoryMetaAdapter {
	pub sites: RwLock<Vec<Site>>,
	pub pages: RwLock<Vec<Page>>,
	pub modules: RwLock<Vec<Module>>,
	pub page_modules: RwLock<Vec<PageModule>>,
	pub settings: RwLock<Vec<Setting>>,
	pub languages: RwLock<Vec<Language>>,
	pub permissions: RwLock<Vec<Permission>>,
	next_page_id: AtomicU32,
	pub read_site_calls: AtomicU32,
}

impl InMemoryMetaAdapter {
	pub fn read_site_calls(&self) -> u32 {
		self.read_site_calls.load(Ordering::SeqCst)
	}

	pub fn remove_module(&self, module_id: ModuleId) {
		self.modules.write().retain(|m| m.module_id != module_id);
	}
}

#[async_trait]
impl MetaAdapter for InMemoryMetaAdapter {
	async fn read_site(&self, _tn_id: TnId, site_id: SiteId) -> TsResult<Site> {
		self.read_site_calls.fetch_add(1, Ordering::SeqCst);
		self.sites.read().iter().find(|s| s.site_id == site_id).cloned().ok_or(Error::NotFound)
	}

	async fn list_sites(&self, tn_id: TnId) -> TsResult<Vec<Site>> {
		Ok(self.sites.read().iter().filter(|s| s.tn_id == tn_id).cloned().collect())
	}

	async fn update_site(&self, _tn_id: TnId, site: &Site) -> TsResult<()> {
		let mut sites = self.sites.write();
		let existing =
			sites.iter_mut().find(|s| s.site_id == site.site_id).ok_or(Error::NotFound)?;
		*existing = site.clone();
		Ok(())
	}

	async fn list_pages(&self, _tn_id: TnId, site_id: SiteId) -> TsResult<Vec<Page>> {
		Ok(self.pages.read().iter().filter(|p| p.site_id == site_id).cloned().collect())
	}

	async fn read_page(&self, _tn_id: TnId, page_id: PageId) -> TsResult<Page> {
		self.pages.read().iter().find(|p| p.page_id == page_id).cloned().ok_or(Error::NotFound)
	}

	async fn create_page(&self, _tn_id: TnId, page: &Page) -> TsResult<Page> {
		let mut page = page.clone();
		page.page_id = self.next_page_id.fetch_add(1, Ordering::SeqCst) + 1000;
		self.pages.write().push(page.clone());
		Ok(page)
	}

	async fn update_page(&self, _tn_id: TnId, page: &Page) -> TsResult<()> {
		let mut pages = self.pages.write();
		let existing =
			pages.iter_mut().find(|p| p.page_id == page.page_id).ok_or(Error::NotFound)?;
		*existing = page.clone();
		Ok(())
	}

	async fn delete_page(&self, _tn_id: TnId, page_id: PageId) -> TsResult<()> {
		let mut pages = self.pages.write();
		let before = pages.len();
		pages.retain(|p| p.page_id != page_id);
		if pages.len() == before { Err(Error::NotFound) } else { Ok(()) }
	}

	async fn list_modules(&self, _tn_id: TnId, site_id: SiteId) -> TsResult<Vec<Module>> {
		Ok(self.modules.read().iter().filter(|m| m.site_id == site_id).cloned().collect())
	}

	async fn list_page_modules(&self, _tn_id: TnId, site_id: SiteId) -> TsResult<Vec<PageModule>> {
		let page_ids: Vec<PageId> = self
			.pages
			.read()
			.iter()
			.filter(|p| p.site_id == site_id)
			.map(|p| p.page_id)
			.collect();
		Ok(self
			.page_modules
			.read()
			.iter()
			.filter(|pm| page_ids.contains(&pm.page_id))
			.cloned()
			.collect())
	}

	async fn list_settings(&self, _tn_id: TnId, entity_name: &str) -> TsResult<Vec<Setting>> {
		Ok(self
			.settings
			.read()
			.iter()
			.filter(|s| s.entity_name.as_ref() == entity_name)
			.cloned()
			.collect())
	}

	async fn update_setting(&self, _tn_id: TnId, setting: &Setting) -> TsResult<()> {
		let mut settings = self.settings.write();
		match settings.iter_mut().find(|s| {
			s.entity_name == setting.entity_name
				&& s.entity_id == setting.entity_id
				&& s.setting_name == setting.setting_name
		}) {
			Some(existing) => *existing = setting.clone(),
			None => settings.push(setting.clone()),
		}
		Ok(())
	}

	async fn list_languages(&self, _tn_id: TnId, site_id: SiteId) -> TsResult<Vec<Language>> {
		Ok(self.languages.read().iter().filter(|l| l.site_id == site_id).cloned().collect())
	}

	async fn list_permissions(
		&self,
		_tn_id: TnId,
		site_id: SiteId,
		entity_name: &str,
	) -> TsResult<Vec<Permission>> {
		Ok(self
			.permissions
			.read()
			.iter()
			.filter(|p| p.site_id == site_id && p.entity_name.as_ref() == entity_name)
			.cloned()
			.collect())
	}

	async fn list_entity_permissions(
		&self,
		_tn_id: TnId,
		entity_name: &str,
		entity_id: u32,
	) -> TsResult<Vec<Permission>> {
		Ok(self
			.permissions
			.read()
			.iter()
			.filter(|p| p.entity_name.as_ref() == entity_name && p.entity_id == entity_id)
			.cloned()
			.collect())
	}

	async fn replace_permissions(
		&self,
		_tn_id: TnId,
		site_id: SiteId,
		entity_name: &str,
		entity_id: u32,
		encoded: &str,
	) -> TsResult<()> {
		let mut permissions = self.permissions.write();
		permissions.retain(|p| !(p.entity_name.as_ref() == entity_name && p.entity_id == entity_id));
		for (permission_name, principal, allow) in PermissionSet::decode(encoded).entries() {
			let (role_name, user_id) = match principal {
				Principal::Role(role) => (Some(role.clone()), None),
				Principal::User(user_id) => (None, Some(*user_id)),
			};
			permissions.push(Permission {
				permission_id: 0,
				site_id,
				entity_name: entity_name.into(),
				entity_id,
				permission_name: permission_name.into(),
				role_name,
				user_id,
				is_authorized: allow,
			});
		}
		Ok(())
	}
}

#[derive(Debug, Default)]
pub struct InMemorySyncAdapter {
	pub events: RwLock<Vec<SyncEvent>>,
}

#[async_trait]
impl SyncAdapter for InMemorySyncAdapter {
	async fn append_event(&self, event: &SyncEvent) -> TsResult<()> {
		self.events.write().push(event.clone());
		Ok(())
	}

	async fn events_since(&self, tn_id: TnId, since: Timestamp) -> TsResult<Vec<SyncEvent>> {
		Ok(self
			.events
			.read()
			.iter()
			.filter(|ev| ev.tn_id == tn_id && ev.modified_on > since)
			.cloned()
			.collect())
	}

	async fn prune(&self, cutoff: Timestamp) -> TsResult<usize> {
		let mut events = self.events.write();
		let before = events.len();
		events.retain(|ev| ev.modified_on >= cutoff);
		Ok(before - events.len())
	}
}

// vim: ts=4
