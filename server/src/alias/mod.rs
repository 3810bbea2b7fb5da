//! Alias resolution and administration.
//!
//! An alias maps a host name (with optional path prefix) onto a
//! tenant/site. The full alias set is small and read-mostly, so it is
//! cached wholesale with a sliding expiration and invalidated as a whole
//! on any mutation: correctness over granularity.

use std::sync::Arc;

use crate::core::{auth::AuthCtx, cache::Cache};
use crate::master_adapter::{Alias, MasterAdapter};
use crate::meta_adapter::ENTITY_ALIAS;
use crate::prelude::*;
use crate::sync::SyncManager;

const ALIAS_CACHE_KEY: &str = "aliases";
const ALIAS_CACHE_TTL_SECS: i64 = 30 * 60;

/// Path segments that can never be part of an alias name. Segments from
/// the first reserved segment onward are routing, not identity.
const RESERVED_SEGMENTS: &[&str] = &["api", "pages", "*"];

pub struct AliasService {
	master: Arc<dyn MasterAdapter>,
	sync: SyncManager,
	cache: Cache<String, Arc<[Alias]>>,
}

impl AliasService {
	pub fn new(master: Arc<dyn MasterAdapter>, sync: SyncManager) -> Self {
		Self { master, sync, cache: Cache::new(4, ALIAS_CACHE_TTL_SECS) }
	}

	async fn cached_aliases(&self) -> TsResult<Arc<[Alias]>> {
		if let Some(aliases) = self.cache.get(&ALIAS_CACHE_KEY.to_string()) {
			return Ok(aliases);
		}
		let aliases: Arc<[Alias]> = self.master.list_aliases().await?.into();
		self.cache.put(ALIAS_CACHE_KEY.to_string(), aliases.clone());
		debug!("Alias cache loaded ({} aliases)", aliases.len());
		Ok(aliases)
	}

	/// Resolves an inbound host+path to the best-matching alias.
	///
	/// Candidate prefixes run from the full path down to the bare host, so
	/// a more specific alias (`example.com/blog`) overrides a host-level
	/// one. Falls back to the `"*"` alias, then `NotFound`.
	pub async fn resolve(&self, host_and_path: &str) -> TsResult<Alias> {
		let aliases = self.cached_aliases().await?;
		find_match(&aliases, host_and_path).cloned().ok_or_else(|| {
			debug!("No alias match for '{}'", host_and_path);
			Error::NotFound
		})
	}

	pub async fn create_alias(&self, auth: &AuthCtx, alias: &Alias) -> TsResult<Alias> {
		self.check_admin(auth, "create")?;
		self.check_name(alias, true).await?;
		let alias = self.master.create_alias(alias).await?;
		self.invalidate(&alias).await?;
		info!("Alias '{}' created for site {}", alias.name, alias.site_id);
		Ok(alias)
	}

	pub async fn update_alias(&self, auth: &AuthCtx, alias: &Alias) -> TsResult<()> {
		self.check_admin(auth, "update")?;
		self.check_name(alias, false).await?;
		self.master.update_alias(alias).await?;
		self.invalidate(alias).await?;
		info!("Alias '{}' updated", alias.name);
		Ok(())
	}

	pub async fn delete_alias(&self, auth: &AuthCtx, alias_id: AliasId) -> TsResult<()> {
		self.check_admin(auth, "delete")?;
		let alias = self.master.read_alias(alias_id).await?;
		self.master.delete_alias(alias_id).await?;
		self.invalidate(&alias).await?;
		info!("Alias '{}' deleted", alias.name);
		Ok(())
	}

	fn check_admin(&self, auth: &AuthCtx, op: &str) -> TsResult<()> {
		if !auth.is_admin() {
			warn!("Unauthorized alias {} attempt", op);
			return Err(Error::PermissionDenied);
		}
		Ok(())
	}

	/// Alias names are unique: at most one row may exactly match a name
	async fn check_name(&self, alias: &Alias, new: bool) -> TsResult<()> {
		if alias.name.is_empty() || alias.name.contains(char::is_whitespace) {
			return Err(Error::Invalid("alias name".into()));
		}
		let aliases = self.cached_aliases().await?;
		let clash = aliases.iter().any(|existing| {
			existing.name.eq_ignore_ascii_case(&alias.name)
				&& (new || existing.alias_id != alias.alias_id)
		});
		if clash {
			return Err(Error::Conflict);
		}
		Ok(())
	}

	async fn invalidate(&self, alias: &Alias) -> TsResult<()> {
		self.cache.invalidate(&ALIAS_CACHE_KEY.to_string());
		self.sync.add_event(alias.tn_id, ENTITY_ALIAS, alias.alias_id, false).await
	}
}

/// Longest-prefix match over the alias set, wildcard as last resort
fn find_match<'a>(aliases: &'a [Alias], host_and_path: &str) -> Option<&'a Alias> {
	let segments: Vec<&str> =
		host_and_path.split('/').filter(|segment| !segment.is_empty()).collect();

	let candidates = segments
		.iter()
		.position(|segment| RESERVED_SEGMENTS.contains(segment))
		.unwrap_or(segments.len());

	for len in (1..=candidates).rev() {
		let name = segments[..len].join("/");
		if let Some(alias) = aliases.iter().find(|alias| alias.name.eq_ignore_ascii_case(&name)) {
			return Some(alias);
		}
	}

	aliases.iter().find(|alias| alias.name.as_ref() == "*")
}


// vim: ts=4
