//! Native type name to Go type translation

use std::{collections::HashMap, str::FromStr};

use crate::error::GenError;

/// Representation strategy for generated fields, fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
	/// Plain Go types: `string`, `int32`, `time.Time`
	Plain,
	/// A `sql.Null*` box for every column regardless of the column's NOT NULL
	Nullable,
	/// The selector used to unwrap a `sql.Null*` box on assignment. Never
	/// selectable from the command line; only the list-function body uses it
	Accessor,
}

impl FromStr for Nullability {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"plain" => Ok(Nullability::Plain),
			"nullable" => Ok(Nullability::Nullable),
			_ => Err(format!("unknown nullability policy {:?}", s)),
		}
	}
}

/// The Go spelling of one native base type under each policy
#[derive(Debug, Clone, Copy)]
struct GoTypes {
	plain: &'static str,
	nullable: &'static str,
	accessor: &'static str,
}

impl GoTypes {
	fn pick(&self, policy: Nullability) -> &'static str {
		match policy {
			Nullability::Plain => self.plain,
			Nullability::Nullable => self.nullable,
			Nullability::Accessor => self.accessor,
		}
	}
}

const fn go(plain: &'static str, nullable: &'static str, accessor: &'static str) -> GoTypes {
	GoTypes { plain, nullable, accessor }
}

/// Both the internal catalog names (`int4`) and the formatted spellings the
/// catalog hands back for function signatures (`integer`) are listed, so either
/// route into the table resolves.
///
/// Integer and float widths follow the declared width of the native type.
/// `numeric` and `money` are arbitrary precision in the database; they collapse
/// to the widest float available, which loses precision past 2^53.
/// `database/sql` has no 32-bit nullable float box, so `real` shares
/// `sql.NullFloat64` with the 64-bit types.
const BASE_TYPES: &[(&str, GoTypes)] = &[
	("bool", go("bool", "sql.NullBool", "Bool")),
	("boolean", go("bool", "sql.NullBool", "Bool")),
	("int2", go("int16", "sql.NullInt16", "Int16")),
	("smallint", go("int16", "sql.NullInt16", "Int16")),
	("int", go("int32", "sql.NullInt32", "Int32")),
	("int4", go("int32", "sql.NullInt32", "Int32")),
	("integer", go("int32", "sql.NullInt32", "Int32")),
	("int8", go("int64", "sql.NullInt64", "Int64")),
	("bigint", go("int64", "sql.NullInt64", "Int64")),
	("oid", go("int64", "sql.NullInt64", "Int64")),
	("float4", go("float32", "sql.NullFloat64", "Float64")),
	("real", go("float32", "sql.NullFloat64", "Float64")),
	("float8", go("float64", "sql.NullFloat64", "Float64")),
	("double precision", go("float64", "sql.NullFloat64", "Float64")),
	("numeric", go("float64", "sql.NullFloat64", "Float64")),
	("decimal", go("float64", "sql.NullFloat64", "Float64")),
	("money", go("float64", "sql.NullFloat64", "Float64")),
	("date", go("time.Time", "sql.NullTime", "Time")),
	("time", go("time.Time", "sql.NullTime", "Time")),
	("timetz", go("time.Time", "sql.NullTime", "Time")),
	("time without time zone", go("time.Time", "sql.NullTime", "Time")),
	("time with time zone", go("time.Time", "sql.NullTime", "Time")),
	("timestamp", go("time.Time", "sql.NullTime", "Time")),
	("timestamptz", go("time.Time", "sql.NullTime", "Time")),
	("timestamp without time zone", go("time.Time", "sql.NullTime", "Time")),
	("timestamp with time zone", go("time.Time", "sql.NullTime", "Time")),
	("interval", go("time.Time", "sql.NullTime", "Time")),
	("text", go("string", "sql.NullString", "String")),
	("varchar", go("string", "sql.NullString", "String")),
	("character varying", go("string", "sql.NullString", "String")),
	("bpchar", go("string", "sql.NullString", "String")),
	("character", go("string", "sql.NullString", "String")),
	("char", go("string", "sql.NullString", "String")),
	("name", go("string", "sql.NullString", "String")),
	("uuid", go("string", "sql.NullString", "String")),
	("json", go("string", "sql.NullString", "String")),
	("jsonb", go("string", "sql.NullString", "String")),
	("xml", go("string", "sql.NullString", "String")),
	("inet", go("string", "sql.NullString", "String")),
	("cidr", go("string", "sql.NullString", "String")),
	("macaddr", go("string", "sql.NullString", "String")),
	("macaddr8", go("string", "sql.NullString", "String")),
	("bit", go("string", "sql.NullString", "String")),
	("varbit", go("string", "sql.NullString", "String")),
	("bit varying", go("string", "sql.NullString", "String")),
	("bytea", go("string", "sql.NullString", "String")),
];

/// Domain aliases cannot cycle in a healthy catalog; the bound only keeps a
/// corrupted chain from looping forever
const MAX_ALIAS_HOPS: usize = 8;

/// Maps native base type names to Go type names
///
/// The base mapping is fixed at construction. The domain alias mapping is
/// populated once, by the bootstrap scan, before any object is translated and
/// is read only afterwards.
#[derive(Debug)]
pub struct TranslationTable {
	base: HashMap<&'static str, GoTypes>,
	domains: HashMap<String, String>,
}

impl TranslationTable {
	pub fn new() -> TranslationTable {
		TranslationTable {
			base: BASE_TYPES.iter().cloned().collect(),
			domains: HashMap::new(),
		}
	}

	/// Registers a domain and the base type name it aliases, which may itself
	/// be a domain
	pub fn add_domain(&mut self, domain: String, base_type: String) {
		self.domains.insert(domain, base_type);
	}

	/// Translates a base type name, an array-of-base-type name, or a registered
	/// domain alias into the Go type for `policy`
	pub fn translate(&self, type_name: &str, policy: Nullability) -> Result<&'static str, GenError> {
		let mut name = normalize(type_name);
		for _ in 0..=MAX_ALIAS_HOPS {
			if let Some(go_types) = self.base.get(name) {
				return Ok(go_types.pick(policy));
			}
			match self.domains.get(name) {
				Some(next) => name = normalize(next),
				None => break,
			}
		}
		Err(GenError::UnknownType(type_name.to_string()))
	}

	#[cfg(test)]
	pub(crate) fn base_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.base.keys().cloned()
	}
}

impl Default for TranslationTable {
	fn default() -> Self {
		TranslationTable::new()
	}
}

/// Strips the decorations a formatted type expression can carry: a precision
/// suffix, array brackets, and the catalog's leading underscore array marker
fn normalize(name: &str) -> &str {
	let mut n = name.trim();
	if let Some(ix) = n.find('(') {
		n = n[..ix].trim_end();
	}
	n = n.strip_suffix("[]").unwrap_or(n).trim_end();
	n.strip_prefix('_').unwrap_or(n)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn policies_are_distinct_for_every_base_type() {
		let table = TranslationTable::new();
		for name in table.base_names() {
			let plain = table.translate(name, Nullability::Plain).unwrap();
			let nullable = table.translate(name, Nullability::Nullable).unwrap();
			let accessor = table.translate(name, Nullability::Accessor).unwrap();
			assert!(!plain.is_empty() && !nullable.is_empty() && !accessor.is_empty());
			assert_ne!(plain, nullable, "plain and nullable agree for {}", name);
		}
	}

	#[test]
	fn domain_chains_resolve_to_their_base_type() {
		let mut table = TranslationTable::new();
		table.add_domain("order_total".to_string(), "positive_number".to_string());
		table.add_domain("positive_number".to_string(), "numeric".to_string());
		assert_eq!(
			table.translate("order_total", Nullability::Plain).unwrap(),
			table.translate("numeric", Nullability::Plain).unwrap(),
		);
		assert_eq!(
			table.translate("order_total", Nullability::Nullable).unwrap(),
			"sql.NullFloat64",
		);
	}

	#[test]
	fn unknown_type_fails() {
		let table = TranslationTable::new();
		match table.translate("no_such_type", Nullability::Plain) {
			Err(GenError::UnknownType(name)) => assert_eq!(name, "no_such_type"),
			other => panic!("expected UnknownType, got {:?}", other),
		}
	}

	#[test]
	fn alias_cycles_are_bounded() {
		let mut table = TranslationTable::new();
		table.add_domain("a".to_string(), "b".to_string());
		table.add_domain("b".to_string(), "a".to_string());
		assert!(matches!(
			table.translate("a", Nullability::Plain),
			Err(GenError::UnknownType(_))
		));
	}

	#[test]
	fn decorated_names_normalize_before_lookup() {
		let table = TranslationTable::new();
		assert_eq!(table.translate("_int4", Nullability::Plain).unwrap(), "int32");
		assert_eq!(table.translate("integer[]", Nullability::Plain).unwrap(), "int32");
		assert_eq!(table.translate("numeric(10,2)", Nullability::Plain).unwrap(), "float64");
		assert_eq!(
			table.translate("character varying(40)", Nullability::Nullable).unwrap(),
			"sql.NullString",
		);
	}
}
