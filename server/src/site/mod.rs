//! Site view aggregation.
//!
//! Composes pages, modules, settings and languages into one coherent
//! per-request payload, permission-filtered for the caller. Visibility
//! differs per caller, so only anonymous requests are served from the
//! per-site view cache; cached entries carry the sync watermark taken at
//! assembly time and are dropped as soon as a newer relevant sync event
//! exists, which is how writes in other processes become visible here.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{auth::AuthCtx, cache::Cache, request::RequestCtx};
use crate::meta_adapter::{
	ENTITY_MODULE, ENTITY_PAGE, ENTITY_SITE, Language, MetaAdapter, Page, Setting, Site,
};
use crate::page::build_hierarchy;
use crate::perm::{self, PermissionSet};
use crate::prelude::*;
use crate::sync::SyncManager;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Synthetic language appended when a site defines none for a culture
pub const DEFAULT_CULTURE: &str = "en";
const DEFAULT_CULTURE_NAME: &str = "English";

const VIEW_CACHE_CAPACITY: usize = 100;
const VIEW_CACHE_TTL_SECS: i64 = 30 * 60;

/// Entity changes that make a cached site view stale
const VIEW_ENTITIES: &[&str] = &[ENTITY_SITE, ENTITY_PAGE, ENTITY_MODULE];

/// One module placement flattened together with its module's shared
/// attributes, the shape the presentation layer renders from
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInstance {
	pub page_module_id: PageModuleId,
	pub module_id: ModuleId,
	pub page_id: PageId,
	pub site_id: SiteId,
	pub title: Box<str>,
	pub pane: Box<str>,
	pub order: i32,
	pub container_type: Box<str>,
	pub module_definition_name: Box<str>,
	pub all_pages: bool,
	pub permissions: Box<str>,
	#[serde(flatten)]
	pub audit: Audit,
	#[serde(flatten)]
	pub deletable: Deletable,
	pub settings: HashMap<Box<str>, Box<str>>,
}

/// The fully assembled per-request site payload
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteView {
	#[serde(flatten)]
	pub site: Site,
	pub settings: HashMap<Box<str>, Box<str>>,
	pub pages: Vec<Page>,
	pub modules: Vec<ModuleInstance>,
	pub languages: Vec<Language>,
}

#[derive(Clone)]
struct CachedView {
	view: Arc<SiteView>,
	watermark: Timestamp,
}

pub struct SiteService {
	meta: Arc<dyn MetaAdapter>,
	sync: SyncManager,
	cache: Cache<String, CachedView>,
}

impl SiteService {
	pub fn new(meta: Arc<dyn MetaAdapter>, sync: SyncManager) -> Self {
		Self { meta, sync, cache: Cache::new(VIEW_CACHE_CAPACITY, VIEW_CACHE_TTL_SECS) }
	}

	/// Assembles the site view for the caller.
	///
	/// A `site_id` that does not match the request's resolved alias is a
	/// hard failure, independent of role; an under-privileged caller
	/// otherwise just sees a reduced tree.
	pub async fn get_site_view(
		&self,
		site_id: SiteId,
		ctx: &RequestCtx,
	) -> TsResult<Arc<SiteView>> {
		// tenant identity is already bound by RequestCtx::resolve
		if site_id != ctx.alias.site_id {
			warn!("Unauthorized site view attempt for site {}", site_id);
			return Err(Error::PermissionDenied);
		}
		let tn_id = ctx.alias.tn_id;

		let cache_key = if ctx.auth.is_authenticated() {
			None
		} else {
			let culture = ctx.culture.as_deref().unwrap_or(DEFAULT_CULTURE);
			Some(format!("site:{}:{}:{}", tn_id, site_id, culture))
		};

		if let Some(key) = &cache_key {
			if let Some(cached) = self.cache.get(key) {
				if !self.sync.has_events_since(tn_id, VIEW_ENTITIES, cached.watermark).await? {
					debug!("Site view cache hit: {}", key);
					return Ok(cached.view);
				}
				self.cache.invalidate(key);
			}
		}

		// the watermark backs off one second so a write concurrent with
		// assembly is never missed by the strictly-newer event scan
		let watermark = Timestamp::now().add_seconds(-1);
		let view = Arc::new(self.assemble(tn_id, site_id, &ctx.auth).await?);

		if let Some(key) = cache_key {
			self.cache.put(key, CachedView { view: view.clone(), watermark });
		}
		Ok(view)
	}

	async fn assemble(&self, tn_id: TnId, site_id: SiteId, auth: &AuthCtx) -> TsResult<SiteView> {
		let site = self.meta.read_site(tn_id, site_id).await?;

		// site settings
		let site_rows = self.meta.list_entity_permissions(tn_id, ENTITY_SITE, site_id).await?;
		let site_perms = PermissionSet::from_rows(site_id, &site_rows);
		let can_edit_site = site_perms.is_authorized(auth, perm::EDIT);
		let site_settings = self.meta.list_settings(tn_id, ENTITY_SITE).await?;
		let settings = collect_settings(&site_settings, site_id, can_edit_site);

		// pages
		let page_rows = self.meta.list_permissions(tn_id, site_id, ENTITY_PAGE).await?;
		let page_settings = self.meta.list_settings(tn_id, ENTITY_PAGE).await?;
		let mut pages = Vec::new();
		for mut page in self.meta.list_pages(tn_id, site_id).await? {
			let perms = PermissionSet::from_rows(page.page_id, &page_rows);
			page.permissions = perms.encode();
			if perms.is_authorized(auth, perm::VIEW) {
				let can_edit = perms.is_authorized(auth, perm::EDIT);
				page.settings = collect_settings(&page_settings, page.page_id, can_edit);
				pages.push(page);
			}
		}
		let pages = build_hierarchy(pages);

		// modules
		let modules = self.list_module_instances(tn_id, site_id, auth).await?;

		// languages: at least one entry, exactly one marked default
		let mut languages = self.meta.list_languages(tn_id, site_id).await?;
		let is_default = !languages.iter().any(|language| language.is_default);
		languages.push(Language {
			language_id: 0,
			site_id,
			code: DEFAULT_CULTURE.into(),
			name: DEFAULT_CULTURE_NAME.into(),
			version: VERSION.into(),
			is_default,
		});

		Ok(SiteView { site, settings, pages, modules, languages })
	}

	async fn list_module_instances(
		&self,
		tn_id: TnId,
		site_id: SiteId,
		auth: &AuthCtx,
	) -> TsResult<Vec<ModuleInstance>> {
		let modules = self.meta.list_modules(tn_id, site_id).await?;
		let module_rows = self.meta.list_permissions(tn_id, site_id, ENTITY_MODULE).await?;
		let module_settings = self.meta.list_settings(tn_id, ENTITY_MODULE).await?;

		let mut instances = Vec::new();
		for placement in self.meta.list_page_modules(tn_id, site_id).await? {
			let Some(module) = modules.iter().find(|m| m.module_id == placement.module_id)
			else {
				// placement without a module: structural change raced us
				warn!("Page module {} references missing module", placement.page_module_id);
				return Err(Error::Conflict);
			};
			let perms = PermissionSet::from_rows(module.module_id, &module_rows);
			if !perms.is_authorized(auth, perm::VIEW) {
				continue;
			}
			let can_edit = perms.is_authorized(auth, perm::EDIT);
			instances.push(ModuleInstance {
				page_module_id: placement.page_module_id,
				module_id: module.module_id,
				page_id: placement.page_id,
				site_id: module.site_id,
				title: placement.title,
				pane: placement.pane,
				order: placement.order,
				container_type: placement.container_type,
				module_definition_name: module.module_definition_name.clone(),
				all_pages: module.all_pages,
				permissions: perms.encode(),
				audit: module.audit.clone(),
				deletable: placement.deletable,
				settings: collect_settings(&module_settings, module.module_id, can_edit),
			});
		}
		Ok(instances)
	}

	/// Admin write path: persists the site, records a sync event and, when
	/// rendering-affecting defaults changed, flags a client reload
	pub async fn update_site(&self, ctx: &RequestCtx, site: &Site) -> TsResult<()> {
		let tn_id = ctx.alias.tn_id;
		if !ctx.auth.is_admin()
			|| site.site_id != ctx.alias.site_id
			|| site.tn_id != tn_id
		{
			warn!("Unauthorized site update attempt for site {}", site.site_id);
			return Err(Error::PermissionDenied);
		}
		let current = self.meta.read_site(tn_id, site.site_id).await?;
		let reload_required = current.default_theme_type != site.default_theme_type
			|| current.default_layout_type != site.default_layout_type
			|| current.default_container_type != site.default_container_type;
		self.meta.update_site(tn_id, site).await?;
		self.sync.add_event(tn_id, ENTITY_SITE, site.site_id, reload_required).await?;
		info!("Site '{}' updated", site.name);
		Ok(())
	}

	/// Updates a setting of a site, page or module. Requires Edit on the
	/// owning entity; the sync event carries the owning entity so cached
	/// views go stale.
	pub async fn update_setting(&self, ctx: &RequestCtx, setting: &Setting) -> TsResult<()> {
		let tn_id = ctx.alias.tn_id;
		let entity_name = setting.entity_name.as_ref();
		if !VIEW_ENTITIES.contains(&entity_name) {
			return Err(Error::Invalid("unknown setting entity".into()));
		}
		let rows = self
			.meta
			.list_entity_permissions(tn_id, entity_name, setting.entity_id)
			.await?;
		let perms = PermissionSet::from_rows(setting.entity_id, &rows);
		if !ctx.auth.is_admin() && !perms.is_authorized(&ctx.auth, perm::EDIT) {
			warn!("Unauthorized setting update on {}:{}", entity_name, setting.entity_id);
			return Err(Error::PermissionDenied);
		}
		self.meta.update_setting(tn_id, setting).await?;
		self.sync.add_event(tn_id, entity_name, setting.entity_id, false).await?;
		Ok(())
	}
}

/// Settings of one entity instance as a name/value map; private settings
/// only when the caller can edit the owning entity
fn collect_settings(
	settings: &[Setting],
	entity_id: u32,
	can_edit: bool,
) -> HashMap<Box<str>, Box<str>> {
	settings
		.iter()
		.filter(|setting| setting.entity_id == entity_id)
		.filter(|setting| !setting.is_private || can_edit)
		.map(|setting| (setting.setting_name.clone(), setting.setting_value.clone()))
		.collect()
}


// vim: ts=4
