//! Adapter for the master store: aliases and tenants shared by every
//! server process.
//!
//! Implementations return plain records with no permission filtering
//! applied, that is the engine's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Maps a public host name (with optional path prefix) onto a tenant/site.
///
/// `name` is the immutable identity key, matched case-insensitively.
/// The special name `"*"` acts as a wildcard fallback.
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
	pub alias_id: AliasId,
	pub tn_id: TnId,
	pub site_id: SiteId,
	pub name: Box<str>,
}

/// An isolated logical customer partition owning one or more sites
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
	pub tn_id: TnId,
	pub name: Box<str>,
	/// Opaque identity of the tenant's backing database
	pub db_connection: Box<str>,
}

#[async_trait]
pub trait MasterAdapter: Debug + Send + Sync {
	/// # Aliases
	async fn list_aliases(&self) -> TsResult<Vec<Alias>>;
	async fn read_alias(&self, alias_id: AliasId) -> TsResult<Alias>;
	async fn create_alias(&self, alias: &Alias) -> TsResult<Alias>;
	async fn update_alias(&self, alias: &Alias) -> TsResult<()>;
	async fn delete_alias(&self, alias_id: AliasId) -> TsResult<()>;

	/// # Tenants
	async fn read_tenant(&self, tn_id: TnId) -> TsResult<Tenant>;
	async fn list_tenants(&self) -> TsResult<Vec<Tenant>>;
}

// vim: ts=4
