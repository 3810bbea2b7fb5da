//! Page tree assembly and page administration.
//!
//! The hierarchy builder turns a flat, permission-filtered page list into
//! a pre-order traversal (parent immediately followed by its subtree)
//! with `level` and `has_children` filled in. The parent pointer graph is
//! not guaranteed acyclic by the data layer, so expansion carries an
//! explicit placed-set guard: a cycle is never chased, its pages are
//! emitted once as orphans.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::request::RequestCtx;
use crate::meta_adapter::{ENTITY_PAGE, MetaAdapter, Page};
use crate::perm::{self, PermissionSet};
use crate::prelude::*;
use crate::sync::SyncManager;

/// Orders a flat page list into a pre-order tree traversal.
///
/// Roots are the pages with no parent; children follow their parent in
/// `order`. Every input page appears in the output exactly once: pages
/// whose ancestor chain does not reach a root (orphans, cycles) are
/// appended at the end unexpanded.
pub fn build_hierarchy(mut pages: Vec<Page>) -> Vec<Page> {
	pages.sort_by(|a, b| a.order.cmp(&b.order));

	let mut hierarchy: Vec<Page> = Vec::with_capacity(pages.len());
	let mut placed: HashSet<PageId> = HashSet::with_capacity(pages.len());

	// depth-first with an explicit stack; roots pushed in reverse so pop
	// order follows `order`
	let mut stack: Vec<(usize, i32)> = Vec::new();
	for (idx, page) in pages.iter().enumerate().rev() {
		if page.parent_id.is_none() {
			stack.push((idx, 0));
		}
	}

	while let Some((idx, level)) = stack.pop() {
		let page_id = pages[idx].page_id;
		if !placed.insert(page_id) {
			continue;
		}
		let mut page = pages[idx].clone();
		page.level = level;
		page.has_children =
			pages.iter().any(|p| p.parent_id == Some(page_id) && p.page_id != page_id);
		hierarchy.push(page);

		for (child_idx, child) in pages.iter().enumerate().rev() {
			if child.parent_id == Some(page_id) && child.page_id != page_id {
				stack.push((child_idx, level + 1));
			}
		}
	}

	// orphans keep their sort order, appended after the tree
	for page in pages {
		if !placed.contains(&page.page_id) {
			hierarchy.push(page);
		}
	}

	hierarchy
}

pub struct PageService {
	meta: Arc<dyn MetaAdapter>,
	sync: SyncManager,
}

impl PageService {
	pub fn new(meta: Arc<dyn MetaAdapter>, sync: SyncManager) -> Self {
		Self { meta, sync }
	}

	pub async fn add_page(&self, ctx: &RequestCtx, page: &Page) -> TsResult<Page> {
		if !ctx.auth.is_admin() || page.site_id != ctx.alias.site_id {
			warn!("Unauthorized page add attempt on site {}", page.site_id);
			return Err(Error::PermissionDenied);
		}
		self.check_parent(ctx, page).await?;
		let tn_id = ctx.alias.tn_id;
		let page = self.meta.create_page(tn_id, page).await?;
		self.meta
			.replace_permissions(tn_id, page.site_id, ENTITY_PAGE, page.page_id, &page.permissions)
			.await?;
		self.sync.add_event(tn_id, ENTITY_PAGE, page.page_id, false).await?;
		info!("Page '{}' added to site {}", page.name, page.site_id);
		Ok(page)
	}

	pub async fn update_page(&self, ctx: &RequestCtx, page: &Page) -> TsResult<()> {
		let tn_id = ctx.alias.tn_id;
		let current = self.meta.read_page(tn_id, page.page_id).await?;
		if page.site_id != ctx.alias.site_id || current.site_id != page.site_id {
			warn!("Unauthorized page update attempt on page {}", page.page_id);
			return Err(Error::PermissionDenied);
		}
		if !ctx.auth.is_admin() && !self.can_edit(ctx, page.page_id).await? {
			return Err(Error::PermissionDenied);
		}
		self.check_parent(ctx, page).await?;
		self.meta.update_page(tn_id, page).await?;
		self.meta
			.replace_permissions(tn_id, page.site_id, ENTITY_PAGE, page.page_id, &page.permissions)
			.await?;
		self.sync.add_event(tn_id, ENTITY_PAGE, page.page_id, false).await?;
		info!("Page '{}' updated", page.name);
		Ok(())
	}

	pub async fn delete_page(&self, ctx: &RequestCtx, page_id: PageId) -> TsResult<()> {
		let tn_id = ctx.alias.tn_id;
		let page = self.meta.read_page(tn_id, page_id).await?;
		if page.site_id != ctx.alias.site_id {
			warn!("Unauthorized page delete attempt on page {}", page_id);
			return Err(Error::PermissionDenied);
		}
		if !ctx.auth.is_admin() && !self.can_edit(ctx, page_id).await? {
			return Err(Error::PermissionDenied);
		}
		self.meta.replace_permissions(tn_id, page.site_id, ENTITY_PAGE, page_id, "").await?;
		self.meta.delete_page(tn_id, page_id).await?;
		self.sync.add_event(tn_id, ENTITY_PAGE, page_id, false).await?;
		info!("Page '{}' deleted", page.name);
		Ok(())
	}

	/// The permission rows are the source of truth; the encoded string on
	/// the page record is a materialization and may lag behind
	async fn can_edit(&self, ctx: &RequestCtx, page_id: PageId) -> TsResult<bool> {
		let rows = self.meta.list_entity_permissions(ctx.alias.tn_id, ENTITY_PAGE, page_id).await?;
		Ok(PermissionSet::from_rows(page_id, &rows).is_authorized(&ctx.auth, perm::EDIT))
	}

	/// A parent reference must stay within the page's own site. Cycles are
	/// a caller error the hierarchy builder tolerates, but a foreign or
	/// self parent is rejected outright.
	async fn check_parent(&self, ctx: &RequestCtx, page: &Page) -> TsResult<()> {
		let Some(parent_id) = page.parent_id else { return Ok(()) };
		if parent_id == page.page_id {
			return Err(Error::Invalid("page cannot be its own parent".into()));
		}
		let parent = self.meta.read_page(ctx.alias.tn_id, parent_id).await?;
		if parent.site_id != page.site_id {
			return Err(Error::Invalid("parent page belongs to another site".into()));
		}
		Ok(())
	}
}


// vim: ts=4
