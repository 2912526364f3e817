//! Function argument and result decomposition
//!
//! The catalog describes a function's parameters in one of two shapes: a pair
//! of formatted text lists, or three parallel comma-joined positional lists of
//! type identifiers, modes, and names. Both decompose to the same pair of
//! ordered, moded column lists.

use crate::{error::GenError, metadata::ColumnMeta};

/// Catalog lookup used to resolve positional type identifiers to native type
/// metadata
pub trait TypeLookup {
	/// Returns a column template with `data_type`, `type_name`, and
	/// `type_category` filled, or `None` when the identifier names no type
	fn type_meta(&mut self, type_id: &str) -> Result<Option<ColumnMeta>, GenError>;
}

/// Textual form: splits `"name type, ..."` argument text and either
/// `"TABLE(name type, ...)"` or bare scalar result text
///
/// A bare scalar result yields a single unnamed result column
pub fn decompose_text(
	argument_types: &str,
	result_types: &str,
) -> (Vec<ColumnMeta>, Vec<ColumnMeta>) {
	let args = split_typed_list(argument_types);

	let result_types = result_types.trim();
	let results = if let Some(inner) = result_types
		.strip_prefix("TABLE(")
		.and_then(|s| s.strip_suffix(')'))
	{
		split_typed_list(inner)
	} else if result_types.is_empty() {
		Vec::new()
	} else {
		vec![ColumnMeta {
			data_type: result_types.to_string(),
			type_name: result_types.to_string(),
			pos: 1,
			..ColumnMeta::default()
		}]
	};

	(args, results)
}

/// Each entry is `name type`, the name running to the first space; an entry
/// with no space is an unnamed slot of that type
fn split_typed_list(text: &str) -> Vec<ColumnMeta> {
	text.split(", ")
		.map(str::trim)
		.filter(|entry| !entry.is_empty())
		.enumerate()
		.map(|(i, entry)| {
			let (name, typ) = match entry.find(' ') {
				Some(ix) => (&entry[..ix], &entry[ix + 1..]),
				None => ("", entry),
			};
			ColumnMeta {
				name: name.to_string(),
				data_type: typ.to_string(),
				type_name: typ.to_string(),
				pos: (i + 1) as i32,
				..ColumnMeta::default()
			}
		})
		.collect()
}

/// Positional-OID form: zips the three parallel lists, resolves each type
/// identifier through the catalog, and partitions entries by mode (`i` is an
/// input, everything else an output), preserving relative order within each
/// partition
///
/// A missing or short name list gets positional fallback names; a mode list of
/// the wrong length is unrecoverable for this function
pub fn decompose_positional(
	arg_types: &str,
	arg_modes: &str,
	arg_names: &str,
	lookup: &mut dyn TypeLookup,
) -> Result<(Vec<ColumnMeta>, Vec<ColumnMeta>), GenError> {
	if arg_types.trim().is_empty() {
		return Ok((Vec::new(), Vec::new()));
	}

	let types: Vec<&str> = arg_types.split(',').map(str::trim).collect();
	let modes: Vec<&str> = arg_modes.split(',').map(str::trim).collect();
	let names: Vec<&str> = arg_names.split(',').map(str::trim).collect();

	if types.len() != modes.len() {
		return Err(GenError::MalformedArguments(format!(
			"{} types but {} modes",
			types.len(),
			modes.len(),
		)));
	}

	let mut args = Vec::new();
	let mut results = Vec::new();

	for (j, type_id) in types.iter().enumerate() {
		let mut col = lookup
			.type_meta(type_id)?
			.ok_or_else(|| GenError::UnresolvedArgumentType((*type_id).to_string()))?;
		col.pos = (j + 1) as i32;
		col.name = match names.get(j) {
			Some(name) if !name.is_empty() => (*name).to_string(),
			_ => format!("input_{}", j),
		};
		if modes[j] == "i" {
			args.push(col);
		} else {
			results.push(col);
		}
	}

	Ok((args, results))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	struct MapLookup(HashMap<String, ColumnMeta>);

	impl MapLookup {
		fn new(entries: &[(&str, &str, &str)]) -> MapLookup {
			MapLookup(
				entries
					.iter()
					.map(|(id, data_type, type_name)| {
						let col = ColumnMeta {
							data_type: data_type.to_string(),
							type_name: type_name.to_string(),
							..ColumnMeta::default()
						};
						(id.to_string(), col)
					})
					.collect(),
			)
		}
	}

	impl TypeLookup for MapLookup {
		fn type_meta(&mut self, type_id: &str) -> Result<Option<ColumnMeta>, GenError> {
			Ok(self.0.get(type_id).cloned())
		}
	}

	#[test]
	fn textual_table_result_decomposes() {
		let (args, results) =
			decompose_text("p_id integer, p_name text", "TABLE(id integer, name text)");

		let arg_view: Vec<(&str, &str)> =
			args.iter().map(|c| (c.name.as_str(), c.type_name.as_str())).collect();
		assert_eq!(arg_view, vec![("p_id", "integer"), ("p_name", "text")]);

		let result_view: Vec<(&str, &str)> =
			results.iter().map(|c| (c.name.as_str(), c.type_name.as_str())).collect();
		assert_eq!(result_view, vec![("id", "integer"), ("name", "text")]);
		assert_eq!(results[0].pos, 1);
		assert_eq!(results[1].pos, 2);
	}

	#[test]
	fn textual_scalar_result_is_one_unnamed_column() {
		let (args, results) = decompose_text("p_id integer", "integer");
		assert_eq!(args.len(), 1);
		assert_eq!(args[0].name, "p_id");
		assert_eq!(results.len(), 1);
		assert_eq!(results[0].name, "");
		assert_eq!(results[0].type_name, "integer");
	}

	#[test]
	fn textual_empty_lists_are_empty() {
		let (args, results) = decompose_text("", "");
		assert!(args.is_empty());
		assert!(results.is_empty());
	}

	#[test]
	fn positional_partitions_by_mode_in_order() {
		let mut lookup = MapLookup::new(&[
			("23", "integer", "int4"),
			("25", "text", "text"),
		]);
		let (args, results) = decompose_positional(
			"23,25,23,25",
			"i,o,i,o",
			"a,b,c,d",
			&mut lookup,
		)
		.unwrap();

		let arg_names: Vec<&str> = args.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(arg_names, vec!["a", "c"]);
		assert_eq!(args[0].pos, 1);
		assert_eq!(args[1].pos, 3);

		let result_names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(result_names, vec!["b", "d"]);
		assert_eq!(results[0].type_name, "text");
	}

	#[test]
	fn positional_missing_names_get_fallbacks() {
		let mut lookup = MapLookup::new(&[("23", "integer", "int4")]);
		let (args, results) = decompose_positional("23,23", "i,o", "", &mut lookup).unwrap();
		assert_eq!(args[0].name, "input_0");
		assert_eq!(results[0].name, "input_1");
	}

	#[test]
	fn positional_unresolved_type_fails() {
		let mut lookup = MapLookup::new(&[]);
		assert!(matches!(
			decompose_positional("99", "i", "a", &mut lookup),
			Err(GenError::UnresolvedArgumentType(id)) if id == "99"
		));
	}

	#[test]
	fn positional_mode_length_mismatch_fails() {
		let mut lookup = MapLookup::new(&[("23", "integer", "int4")]);
		assert!(matches!(
			decompose_positional("23,23", "i", "a,b", &mut lookup),
			Err(GenError::MalformedArguments(_))
		));
	}
}
