//! Shared fixtures: a seeded engine over in-memory adapters.

#![allow(dead_code)]

pub mod adapters;

use std::sync::Arc;

use tessera::core::auth::AuthCtx;
use tessera::core::request::RequestCtx;
use tessera::core::roles;
use tessera::master_adapter::{Alias, Tenant};
use tessera::meta_adapter::{
	ENTITY_MODULE, ENTITY_PAGE, ENTITY_SITE, Language, Module, Page, PageModule, Permission,
	Setting, Site,
};
use tessera::prelude::*;
use tessera::{App, AppBuilder};

use adapters::{InMemoryMasterAdapter, InMemoryMetaAdapter, InMemorySyncAdapter};

pub const TN: TnId = TnId(1);
pub const SITE: SiteId = 1;
pub const ADMIN_USER: UserId = 10;
pub const MEMBER_USER: UserId = 20;

pub struct TestApp {
	pub app: App,
	pub master: Arc<InMemoryMasterAdapter>,
	pub meta: Arc<InMemoryMetaAdapter>,
	pub sync: Arc<InMemorySyncAdapter>,
}

pub fn page(page_id: PageId, parent_id: Option<PageId>, name: &str, order: i32) -> Page {
	Page {
		page_id,
		site_id: SITE,
		parent_id,
		name: name.into(),
		path: format!("/{}", name).into(),
		order,
		theme_type: "default".into(),
		layout_type: "default".into(),
		icon: "".into(),
		is_navigation: true,
		is_clickable: true,
		audit: Audit::default(),
		deletable: Deletable::default(),
		permissions: "".into(),
		level: 0,
		has_children: false,
		settings: Default::default(),
	}
}

pub fn perm_row(
	entity_name: &str,
	entity_id: u32,
	permission_name: &str,
	role_name: &str,
	allowed: bool,
) -> Permission {
	Permission {
		permission_id: 0,
		site_id: SITE,
		entity_name: entity_name.into(),
		entity_id,
		permission_name: permission_name.into(),
		role_name: Some(role_name.into()),
		user_id: None,
		is_authorized: allowed,
	}
}

pub fn setting(entity_name: &str, entity_id: u32, name: &str, private: bool) -> Setting {
	Setting {
		setting_id: 0,
		entity_name: entity_name.into(),
		entity_id,
		setting_name: name.into(),
		setting_value: format!("{}-value", name).into(),
		is_private: private,
	}
}

fn module(module_id: ModuleId, definition: &str) -> Module {
	Module {
		module_id,
		site_id: SITE,
		module_definition_name: definition.into(),
		all_pages: false,
		audit: Audit::default(),
		deletable: Deletable::default(),
		permissions: "".into(),
	}
}

fn placement(page_module_id: PageModuleId, page_id: PageId, module_id: ModuleId) -> PageModule {
	PageModule {
		page_module_id,
		page_id,
		module_id,
		title: format!("module-{}", module_id).into(),
		pane: "Content".into(),
		order: 1,
		container_type: "default".into(),
		deletable: Deletable::default(),
	}
}

/// Builds an engine seeded with one tenant, one site, three pages, two
/// module placements and a mix of public/private settings.
///
/// Page/module layout:
/// - `home` (1, root) with child `docs` (2), both viewable by everyone
/// - `admin` (3, root) viewable by Administrators only
/// - module 1 on `home` viewable by everyone, module 2 on `admin` by
///   Administrators only
pub fn build_app() -> TestApp {
	adapters::setup_test_logging();

	let master = Arc::new(InMemoryMasterAdapter::default());
	let meta = Arc::new(InMemoryMetaAdapter::default());
	let sync = Arc::new(InMemorySyncAdapter::default());

	master.tenants.write().push(Tenant {
		tn_id: TN,
		name: "acme".into(),
		db_connection: "tenant-1".into(),
	});
	master.aliases.write().extend([
		Alias { alias_id: 1, tn_id: TN, site_id: SITE, name: "site1.com".into() },
		Alias { alias_id: 2, tn_id: TN, site_id: SITE, name: "alias.site1.com".into() },
	]);

	meta.sites.write().push(Site {
		site_id: SITE,
		tn_id: TN,
		name: "Acme".into(),
		logo_file_id: None,
		default_theme_type: "theme-a".into(),
		default_layout_type: "layout-a".into(),
		default_container_type: "container-a".into(),
		audit: Audit::default(),
		deletable: Deletable::default(),
	});

	meta.pages.write().extend([
		page(1, None, "home", 1),
		page(2, Some(1), "docs", 1),
		page(3, None, "admin", 2),
	]);

	meta.modules.write().extend([module(1, "HtmlText"), module(2, "AdminDash")]);
	meta.page_modules.write().extend([placement(1, 1, 1), placement(2, 3, 2)]);

	meta.permissions.write().extend([
		perm_row(ENTITY_SITE, SITE, "View", roles::ALL_USERS, true),
		perm_row(ENTITY_SITE, SITE, "Edit", roles::ADMIN, true),
		perm_row(ENTITY_PAGE, 1, "View", roles::ALL_USERS, true),
		perm_row(ENTITY_PAGE, 1, "Edit", roles::ADMIN, true),
		perm_row(ENTITY_PAGE, 2, "View", roles::ALL_USERS, true),
		perm_row(ENTITY_PAGE, 3, "View", roles::ADMIN, true),
		perm_row(ENTITY_PAGE, 3, "Edit", roles::ADMIN, true),
		perm_row(ENTITY_MODULE, 1, "View", roles::ALL_USERS, true),
		perm_row(ENTITY_MODULE, 1, "Edit", roles::ADMIN, true),
		perm_row(ENTITY_MODULE, 2, "View", roles::ADMIN, true),
		perm_row(ENTITY_MODULE, 2, "Edit", roles::ADMIN, true),
	]);

	meta.settings.write().extend([
		setting(ENTITY_SITE, SITE, "title", false),
		setting(ENTITY_SITE, SITE, "smtp-password", true),
		setting(ENTITY_PAGE, 1, "meta", false),
		setting(ENTITY_PAGE, 1, "draft-notes", true),
		setting(ENTITY_MODULE, 1, "content", false),
		setting(ENTITY_MODULE, 1, "api-key", true),
	]);

	let mut builder = AppBuilder::new();
	builder
		.master_adapter(master.clone())
		.meta_adapter(meta.clone())
		.sync_adapter(sync.clone());
	let app = builder.build();

	TestApp { app, master, meta, sync }
}

pub fn anonymous() -> AuthCtx {
	AuthCtx::anonymous()
}

pub fn admin() -> AuthCtx {
	AuthCtx::user(TN, ADMIN_USER, [roles::REGISTERED, roles::ADMIN])
}

pub fn member() -> AuthCtx {
	AuthCtx::user(TN, MEMBER_USER, [roles::REGISTERED])
}

pub fn host() -> AuthCtx {
	AuthCtx::user(TN, 1, [roles::REGISTERED, roles::HOST])
}

pub async fn ctx(app: &App, auth: AuthCtx) -> RequestCtx {
	RequestCtx::resolve(app, "site1.com", auth).await.expect("request context")
}

pub fn add_language(meta: &InMemoryMetaAdapter, code: &str, is_default: bool) {
	let language_id = meta.languages.read().len() as LanguageId + 1;
	meta.languages.write().push(Language {
		language_id,
		site_id: SITE,
		code: code.into(),
		name: code.to_uppercase().into(),
		version: "1.0".into(),
		is_default,
	});
}

// vim: ts=4
