//! Built-in role names.
//!
//! These are the principals the permission codec recognizes without a
//! matching role membership: `ALL_USERS` applies to every caller
//! including anonymous ones, `REGISTERED` to any caller with a user id.
//! `HOST` is the super-admin role and bypasses permission evaluation
//! entirely.

pub const ALL_USERS: &str = "All Users";
pub const HOST: &str = "Host Users";
pub const ADMIN: &str = "Administrators";
pub const REGISTERED: &str = "Registered Users";

// vim: ts=4
