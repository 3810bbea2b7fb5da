//! Common types used throughout the engine.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Entity ids are plain integers assigned by the backing store
pub type AliasId = u32;
pub type SiteId = u32;
pub type PageId = u32;
pub type ModuleId = u32;
pub type PageModuleId = u32;
pub type LanguageId = u32;
pub type UserId = u32;

// TnId //
//******//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TnId(pub u32);

impl std::fmt::Display for TnId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for TnId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u32(self.0)
	}
}

impl<'de> Deserialize<'de> for TnId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(TnId(u32::deserialize(deserializer)?))
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	pub fn add_seconds(self, secs: i64) -> Self {
		Timestamp(self.0 + secs)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

/// Audit fields shared by every persisted content entity
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
	pub created_by: Box<str>,
	pub created_on: Timestamp,
	pub modified_by: Box<str>,
	pub modified_on: Timestamp,
}

/// Soft-delete fields for entities that are hidden rather than removed
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletable {
	pub deleted_by: Option<Box<str>>,
	pub deleted_on: Option<Timestamp>,
	pub is_deleted: bool,
}

// vim: ts=4
