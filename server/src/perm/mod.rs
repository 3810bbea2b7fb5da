//! Permission codec and authorization decisions.
//!
//! Permission rows are materialized into one compact string per entity
//! for transport and fast evaluation. The grammar is groups joined by
//! `|`, each group `name ':' tokens`, tokens semicolon-delimited. A token
//! is a role name or `[user-id]`, prefixed `!` for an explicit deny:
//!
//! ```text
//! View:All Users;![7]|Edit:Administrators;[3]
//! ```
//!
//! Internally the string is decoded once into a structured set and all
//! decisions are made on that; encoding happens only at the boundary.
//! Encoding is stable: the same decision set always yields the same
//! string, so encoded permissions can serve as cache keys.
//!
//! Malformed input degrades to "no decision" (deny-all), never an error:
//! rendering must stay available even with corrupted authorization data.

use std::collections::BTreeMap;

use crate::core::{auth::AuthCtx, roles};
use crate::meta_adapter::Permission;
use crate::prelude::*;

/// Permission names evaluated by the engine
pub const VIEW: &str = "View";
pub const EDIT: &str = "Edit";
pub const BROWSE: &str = "Browse";

/// A principal a permission entry applies to
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Principal {
	Role(Box<str>),
	User(UserId),
}

impl Principal {
	/// Whether this principal covers the given caller.
	///
	/// The built-in all-users role covers everyone including anonymous
	/// callers; the registered role covers any caller with a user id.
	fn matches(&self, auth: &AuthCtx) -> bool {
		match self {
			Principal::User(user_id) => auth.user_id == Some(*user_id),
			Principal::Role(role) => match role.as_ref() {
				roles::ALL_USERS => true,
				roles::REGISTERED => auth.is_authenticated(),
				role => auth.has_role(role),
			},
		}
	}

	/// Whether the principal survives an encode/decode round trip: a role
	/// name carrying grammar characters would decode as something else
	fn encodable(&self) -> bool {
		match self {
			Principal::User(_) => true,
			Principal::Role(role) => {
				!role.is_empty()
					&& !role.contains(['|', ':', ';'])
					&& !role.starts_with('!')
					&& !(role.starts_with('[') && role.ends_with(']'))
			}
		}
	}

	fn parse(token: &str) -> Option<Self> {
		if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
			inner.parse().ok().map(Principal::User)
		} else if token.is_empty() || token.contains(['|', ':', ';']) {
			None
		} else {
			Some(Principal::Role(token.into()))
		}
	}
}

impl std::fmt::Display for Principal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Principal::Role(role) => write!(f, "{}", role),
			Principal::User(user_id) => write!(f, "[{}]", user_id),
		}
	}
}

/// Decoded decision set of one entity: permission name to signed principals
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet {
	groups: BTreeMap<Box<str>, Vec<(Principal, bool)>>,
}

impl PermissionSet {
	/// Decodes an encoded permission string.
	///
	/// Unparsable groups and tokens are skipped: absence of an entry means
	/// no decision, which falls through to deny.
	pub fn decode(encoded: &str) -> Self {
		let mut groups: BTreeMap<Box<str>, Vec<(Principal, bool)>> = BTreeMap::new();
		for group in encoded.split('|') {
			let Some((name, tokens)) = group.split_once(':') else { continue };
			if name.is_empty() {
				continue;
			}
			let entries = groups.entry(name.into()).or_default();
			for token in tokens.split(';') {
				let (token, allow) = match token.strip_prefix('!') {
					Some(token) => (token, false),
					None => (token, true),
				};
				if let Some(principal) = Principal::parse(token) {
					if !entries.iter().any(|(p, a)| *p == principal && *a == allow) {
						entries.push((principal, allow));
					}
				}
			}
		}
		groups.retain(|_, entries| !entries.is_empty());
		Self { groups }
	}

	/// Builds the set from the permission rows of one entity
	pub fn from_rows(entity_id: u32, rows: &[Permission]) -> Self {
		let mut groups: BTreeMap<Box<str>, Vec<(Principal, bool)>> = BTreeMap::new();
		for row in rows.iter().filter(|row| row.entity_id == entity_id) {
			let principal = match (&row.role_name, row.user_id) {
				(Some(role), _) => Principal::Role(role.clone()),
				(None, Some(user_id)) => Principal::User(user_id),
				(None, None) => continue,
			};
			let entries = groups.entry(row.permission_name.clone()).or_default();
			if !entries.iter().any(|(p, a)| *p == principal && *a == row.is_authorized) {
				entries.push((principal, row.is_authorized));
			}
		}
		Self { groups }
	}

	/// Produces the canonical encoded string: groups in name order, tokens
	/// in principal order with denies after allows
	pub fn encode(&self) -> Box<str> {
		let mut out = String::new();
		for (name, entries) in &self.groups {
			let mut entries: Vec<_> =
				entries.iter().filter(|(principal, _)| principal.encodable()).cloned().collect();
			if entries.is_empty() {
				continue;
			}
			entries.sort_by(|(p1, a1), (p2, a2)| a2.cmp(a1).then_with(|| p1.cmp(p2)));
			if !out.is_empty() {
				out.push('|');
			}
			out.push_str(name);
			out.push(':');
			for (i, (principal, allow)) in entries.iter().enumerate() {
				if i > 0 {
					out.push(';');
				}
				if !allow {
					out.push('!');
				}
				out.push_str(&principal.to_string());
			}
		}
		out.into()
	}

	/// Authorization decision for one permission name.
	///
	/// Super admins are always authorized. Otherwise an explicit deny for
	/// the caller's user id or any of its roles outranks any allow, so a
	/// revocation overlay wins; absence of a matching entry denies.
	pub fn is_authorized(&self, auth: &AuthCtx, permission_name: &str) -> bool {
		if auth.is_host() {
			return true;
		}
		let Some(entries) = self.groups.get(permission_name) else { return false };
		if entries.iter().any(|(p, allow)| !allow && p.matches(auth)) {
			return false;
		}
		entries.iter().any(|(p, allow)| *allow && p.matches(auth))
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// All decisions as (permission name, principal, allow) tuples
	pub fn entries(&self) -> impl Iterator<Item = (&str, &Principal, bool)> {
		self.groups.iter().flat_map(|(name, entries)| {
			entries.iter().map(move |(principal, allow)| (name.as_ref(), principal, *allow))
		})
	}
}

/// Encodes the permission rows of one entity into the transport string
pub fn encode(entity_id: u32, rows: &[Permission]) -> Box<str> {
	PermissionSet::from_rows(entity_id, rows).encode()
}

/// Boundary helper: decode once, evaluate once
pub fn is_authorized(auth: &AuthCtx, permission_name: &str, encoded: &str) -> bool {
	PermissionSet::decode(encoded).is_authorized(auth, permission_name)
}


// vim: ts=4
