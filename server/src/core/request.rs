//! Per-request context: resolved alias identity plus caller identity.

use crate::core::auth::AuthCtx;
use crate::master_adapter::{Alias, Tenant};
use crate::prelude::*;

/// Ties the resolved alias to the current request's tenant and caller.
///
/// Everything downstream (aggregation, page administration) trusts this
/// binding; the cross-tenant check happens exactly once, here.
#[derive(Clone, Debug)]
pub struct RequestCtx {
	pub alias: Alias,
	pub tenant: Tenant,
	pub auth: AuthCtx,
	/// Requested culture, part of the anonymous view cache key
	pub culture: Option<Box<str>>,
}

impl RequestCtx {
	/// Resolves the inbound host+path into a request context.
	///
	/// An authenticated caller bound to a different tenant than the alias
	/// is rejected regardless of role.
	pub async fn resolve(app: &App, host_and_path: &str, auth: AuthCtx) -> TsResult<Self> {
		let alias = app.aliases.resolve(host_and_path).await?;
		if let Some(tn_id) = auth.tn_id {
			if tn_id != alias.tn_id {
				warn!(
					"Cross-tenant request: caller tenant {} on alias '{}' (tenant {})",
					tn_id, alias.name, alias.tn_id
				);
				return Err(Error::PermissionDenied);
			}
		}
		let tenant = app.master_adapter.read_tenant(alias.tn_id).await?;
		Ok(Self { alias, tenant, auth, culture: None })
	}

	pub fn with_culture(mut self, culture: impl Into<Box<str>>) -> Self {
		self.culture = Some(culture.into());
		self
	}
}

// vim: ts=4
