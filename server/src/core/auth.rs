//! Caller identity for a single request.

use crate::core::roles;
use crate::prelude::*;

/// Context struct for the caller of the current request.
///
/// Anonymous callers have no user id and no tenant binding; their only
/// effective principal is the built-in all-users role.
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub tn_id: Option<TnId>,
	pub user_id: Option<UserId>,
	pub roles: Box<[Box<str>]>,
}

impl AuthCtx {
	pub fn anonymous() -> Self {
		Self { tn_id: None, user_id: None, roles: Box::new([]) }
	}

	pub fn user(tn_id: TnId, user_id: UserId, roles: impl IntoIterator<Item = impl Into<Box<str>>>) -> Self {
		Self {
			tn_id: Some(tn_id),
			user_id: Some(user_id),
			roles: roles.into_iter().map(|r| r.into()).collect(),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.user_id.is_some()
	}

	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r.as_ref() == role)
	}

	/// Host users are super admins and bypass permission evaluation
	pub fn is_host(&self) -> bool {
		self.has_role(roles::HOST)
	}

	pub fn is_admin(&self) -> bool {
		self.is_host() || self.has_role(roles::ADMIN)
	}
}


// vim: ts=4
