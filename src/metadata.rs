//! Metadata records for the catalog objects a run maps

/// One field, argument, or result slot of a catalog object
#[derive(Debug, Clone, Default)]
pub struct ColumnMeta {
	pub name: String,
	/// Formatted native type expression, precision and array brackets included
	pub data_type: String,
	/// Base type identifier used for translation lookup
	pub type_name: String,
	/// pg_type.typcategory, informational
	pub type_category: String,
	/// 1-based position within the owning object, defines emission order
	pub pos: i32,
	pub not_null: bool,
	/// Always false for owners that are not tables
	pub is_pk: bool,
	/// Catalog comment, empty if absent, may span lines
	pub description: String,
}

/// A user defined composite type
#[derive(Debug, Clone)]
pub struct PsqlUserType {
	pub schema: String,
	pub name: String,
	pub obj_type: String,
	pub description: String,
	pub struct_name: String,
	pub cols: Vec<ColumnMeta>,
}

/// A table, view, materialized view, or foreign table
#[derive(Debug, Clone)]
pub struct PsqlTable {
	pub schema: String,
	pub name: String,
	pub obj_kind: String,
	pub obj_type: String,
	pub description: String,
	pub struct_name: String,
	pub cols: Vec<ColumnMeta>,
}

/// A function or procedure
///
/// `args` and `results` partition the full parameter list by mode; each keeps
/// the declaration order of its members even where the two interleave in the
/// original combined list
#[derive(Debug, Clone)]
pub struct PsqlProc {
	pub schema: String,
	pub name: String,
	pub obj_kind: String,
	pub obj_type: String,
	/// Result type list as formatted by the catalog
	pub result_types: String,
	/// Argument list as formatted by the catalog
	pub argument_types: String,
	pub description: String,
	pub struct_name: String,
	pub results: Vec<ColumnMeta>,
	pub args: Vec<ColumnMeta>,
}

impl PsqlProc {
	/// A result structure is only generated when the function returns two or
	/// more columns; zero- and one-column results read back as bare scalars
	pub fn wants_result_struct(&self) -> bool {
		self.results.len() > 1
	}
}
