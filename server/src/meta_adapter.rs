//! Adapter for per-tenant content metadata: sites, pages, modules,
//! settings, languages and permission rows.
//!
//! All reads return unfiltered records; permission filtering happens in
//! the aggregation layer. Bulk permission reads exist so a whole site can
//! be filtered without per-entity round trips.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Entity names used for permission and setting scoping
pub const ENTITY_SITE: &str = "Site";
pub const ENTITY_PAGE: &str = "Page";
pub const ENTITY_MODULE: &str = "Module";
pub const ENTITY_ALIAS: &str = "Alias";

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
	pub site_id: SiteId,
	pub tn_id: TnId,
	pub name: Box<str>,
	pub logo_file_id: Option<u32>,
	pub default_theme_type: Box<str>,
	pub default_layout_type: Box<str>,
	pub default_container_type: Box<str>,
	#[serde(flatten)]
	pub audit: Audit,
	#[serde(flatten)]
	pub deletable: Deletable,
}

/// A node in a site's navigable content tree.
///
/// `level` and `has_children` are computed at read time by the hierarchy
/// builder and never persisted. `permissions` carries the encoded
/// permission string materialized from the permission rows.
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
	pub page_id: PageId,
	pub site_id: SiteId,
	pub parent_id: Option<PageId>,
	pub name: Box<str>,
	pub path: Box<str>,
	pub order: i32,
	pub theme_type: Box<str>,
	pub layout_type: Box<str>,
	pub icon: Box<str>,
	pub is_navigation: bool,
	pub is_clickable: bool,
	#[serde(flatten)]
	pub audit: Audit,
	#[serde(flatten)]
	pub deletable: Deletable,

	#[serde(default)]
	pub permissions: Box<str>,
	#[serde(default)]
	pub level: i32,
	#[serde(default)]
	pub has_children: bool,
	#[serde(default)]
	pub settings: std::collections::HashMap<Box<str>, Box<str>>,
}

/// A reusable content instance, placed on pages via [`PageModule`]
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
	pub module_id: ModuleId,
	pub site_id: SiteId,
	pub module_definition_name: Box<str>,
	pub all_pages: bool,
	#[serde(flatten)]
	pub audit: Audit,
	#[serde(flatten)]
	pub deletable: Deletable,

	#[serde(default)]
	pub permissions: Box<str>,
}

/// Placement of a module on a specific page and pane
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModule {
	pub page_module_id: PageModuleId,
	pub page_id: PageId,
	pub module_id: ModuleId,
	pub title: Box<str>,
	pub pane: Box<str>,
	pub order: i32,
	pub container_type: Box<str>,
	#[serde(flatten)]
	pub deletable: Deletable,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
	pub setting_id: u32,
	pub entity_name: Box<str>,
	pub entity_id: u32,
	pub setting_name: Box<str>,
	pub setting_value: Box<str>,
	pub is_private: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
	pub language_id: LanguageId,
	pub site_id: SiteId,
	pub code: Box<str>,
	pub name: Box<str>,
	pub version: Box<str>,
	pub is_default: bool,
}

/// One persisted permission decision: (entity, permission name, principal)
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
	pub permission_id: u32,
	pub site_id: SiteId,
	pub entity_name: Box<str>,
	pub entity_id: u32,
	pub permission_name: Box<str>,
	pub role_name: Option<Box<str>>,
	pub user_id: Option<UserId>,
	pub is_authorized: bool,
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	/// # Sites
	async fn read_site(&self, tn_id: TnId, site_id: SiteId) -> TsResult<Site>;
	async fn list_sites(&self, tn_id: TnId) -> TsResult<Vec<Site>>;
	async fn update_site(&self, tn_id: TnId, site: &Site) -> TsResult<()>;

	/// # Pages
	async fn list_pages(&self, tn_id: TnId, site_id: SiteId) -> TsResult<Vec<Page>>;
	async fn read_page(&self, tn_id: TnId, page_id: PageId) -> TsResult<Page>;
	async fn create_page(&self, tn_id: TnId, page: &Page) -> TsResult<Page>;
	async fn update_page(&self, tn_id: TnId, page: &Page) -> TsResult<()>;
	async fn delete_page(&self, tn_id: TnId, page_id: PageId) -> TsResult<()>;

	/// # Modules
	async fn list_modules(&self, tn_id: TnId, site_id: SiteId) -> TsResult<Vec<Module>>;
	async fn list_page_modules(&self, tn_id: TnId, site_id: SiteId) -> TsResult<Vec<PageModule>>;

	/// # Settings (for every instance of an entity type in one read)
	async fn list_settings(&self, tn_id: TnId, entity_name: &str) -> TsResult<Vec<Setting>>;
	async fn update_setting(&self, tn_id: TnId, setting: &Setting) -> TsResult<()>;

	/// # Languages
	async fn list_languages(&self, tn_id: TnId, site_id: SiteId) -> TsResult<Vec<Language>>;

	/// # Permissions
	/// Bulk read for a whole site and entity type, avoids N+1 reads
	async fn list_permissions(
		&self,
		tn_id: TnId,
		site_id: SiteId,
		entity_name: &str,
	) -> TsResult<Vec<Permission>>;
	async fn list_entity_permissions(
		&self,
		tn_id: TnId,
		entity_name: &str,
		entity_id: u32,
	) -> TsResult<Vec<Permission>>;
	/// Replaces all permission rows of an entity with the decoded contents
	/// of `encoded`; an empty string clears them
	async fn replace_permissions(
		&self,
		tn_id: TnId,
		site_id: SiteId,
		entity_name: &str,
		entity_id: u32,
		encoded: &str,
	) -> TsResult<()>;
}

// vim: ts=4
