//! Column layout planning and struct stanza rendering

use crate::{
	error::GenError,
	ident,
	metadata::ColumnMeta,
	translate::{Nullability, TranslationTable},
};

/// Continuation indent for column descriptions that span lines, sized to land
/// under the annotation comment column
const DESC_CONTINUATION: &str = "\n//                                           ";

/// Shared token widths for one object's stanza block
///
/// Widths are computed over the columns of the object being rendered, not the
/// whole run, so the same input columns always produce the same widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StanzaWidths {
	pub var_name: usize,
	pub var_type: usize,
	pub db_name: usize,
}

impl StanzaWidths {
	/// One pass over the columns to find the widest rendered name, type, and
	/// source column name
	pub fn plan(
		cols: &[ColumnMeta],
		table: &TranslationTable,
		policy: Nullability,
	) -> Result<StanzaWidths, GenError> {
		let mut widths = StanzaWidths { var_name: 0, var_type: 0, db_name: 0 };
		for col in cols {
			let var_name = ident::upper_camel(&col.name);
			let var_type = table.translate(&col.type_name, policy)?;
			widths.var_name = widths.var_name.max(var_name.len());
			widths.var_type = widths.var_type.max(var_type.len());
			widths.db_name = widths.db_name.max(col.name.len());
		}
		Ok(widths)
	}
}

/// Renders one column as an aligned struct field line: padded name, padded
/// type, serialization and source column tags, then the annotation comment
/// carrying the native type, `[PK]` and `[Not Null]` markers, and description
pub fn render(
	col: &ColumnMeta,
	widths: &StanzaWidths,
	table: &TranslationTable,
	policy: Nullability,
) -> Result<String, GenError> {
	let var_name = ident::upper_camel(&col.name);
	let json_name = ident::lower_camel(&col.name);
	let var_type = table.translate(&col.type_name, policy)?;

	let mut s = String::from("\t");
	s += &pad(&var_name, widths.var_name + 1);
	s += &pad(var_type, widths.var_type + 1);
	s += &pad(&format!("`json:\"{}\"", json_name), widths.var_name + 9);
	s += &pad(&format!("db:\"{}\"`", col.name), widths.db_name + 6);
	s += " // [";
	s += &col.data_type;
	s += "]";
	if col.is_pk {
		s += " [PK]";
	}
	if col.not_null {
		s += " [Not Null]";
	}
	if !col.description.is_empty() {
		s += " ";
		s += &col.description.replace('\n', DESC_CONTINUATION);
	}
	Ok(s)
}

/// Internal mode: name, nullable-wrapped type, and the source column tag only,
/// for the intermediate shape a list function reads into before unwrapping
pub fn render_internal(
	col: &ColumnMeta,
	widths: &StanzaWidths,
	table: &TranslationTable,
) -> Result<String, GenError> {
	let var_name = ident::upper_camel(&col.name);
	let var_type = table.translate(&col.type_name, Nullability::Nullable)?;

	let mut s = String::from("\t\t");
	s += &pad(&var_name, widths.var_name + 1);
	s += &pad(var_type, widths.var_type + 1);
	s += &format!("`db:\"{}\"`", col.name);
	Ok(s)
}

fn pad(s: &str, width: usize) -> String {
	format!("{:<1$}", s, width)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn col(name: &str, data_type: &str, type_name: &str, pos: i32) -> ColumnMeta {
		ColumnMeta {
			name: name.to_string(),
			data_type: data_type.to_string(),
			type_name: type_name.to_string(),
			pos,
			..ColumnMeta::default()
		}
	}

	fn sample_cols() -> Vec<ColumnMeta> {
		let mut id = col("id", "integer", "int4", 1);
		id.not_null = true;
		id.is_pk = true;
		vec![
			id,
			col("name", "text", "text", 2),
			col("created_at", "timestamp without time zone", "timestamp", 3),
		]
	}

	#[test]
	fn widths_are_deterministic() {
		let table = TranslationTable::new();
		let cols = sample_cols();
		let first = StanzaWidths::plan(&cols, &table, Nullability::Plain).unwrap();
		let second = StanzaWidths::plan(&cols, &table, Nullability::Plain).unwrap();
		assert_eq!(first, second);
		assert_eq!(first, StanzaWidths { var_name: 9, var_type: 9, db_name: 10 });
	}

	#[test]
	fn stanzas_align_and_carry_markers() {
		let table = TranslationTable::new();
		let cols = sample_cols();
		let widths = StanzaWidths::plan(&cols, &table, Nullability::Plain).unwrap();
		let lines: Vec<String> = cols
			.iter()
			.map(|c| render(c, &widths, &table, Nullability::Plain).unwrap())
			.collect();

		assert_eq!(
			lines[0],
			"\tID        int32     `json:\"id\"        db:\"id\"`         // [integer] [PK] [Not Null]",
		);
		assert_eq!(
			lines[1],
			"\tName      string    `json:\"name\"      db:\"name\"`       // [text]",
		);
		assert_eq!(
			lines[2],
			"\tCreatedAt time.Time `json:\"createdAt\" db:\"created_at\"` // [timestamp without time zone]",
		);
	}

	#[test]
	fn multi_line_descriptions_continue_under_the_comment_column() {
		let table = TranslationTable::new();
		let mut c = col("note", "text", "text", 1);
		c.description = "first line\nsecond line".to_string();
		let widths = StanzaWidths::plan(&[c.clone()], &table, Nullability::Nullable).unwrap();
		let line = render(&c, &widths, &table, Nullability::Nullable).unwrap();
		assert!(line.contains(" first line\n//"));
		assert!(line.ends_with("second line"));
	}

	#[test]
	fn internal_mode_has_only_the_db_tag() {
		let table = TranslationTable::new();
		let cols = sample_cols();
		let widths = StanzaWidths::plan(&cols, &table, Nullability::Nullable).unwrap();
		let line = render_internal(&cols[1], &widths, &table).unwrap();
		assert!(line.starts_with("\t\tName"));
		assert!(line.contains("sql.NullString"));
		assert!(line.contains("`db:\"name\"`"));
		assert!(!line.contains("json"));
		assert!(!line.contains("//"));
	}

	#[test]
	fn unknown_column_type_fails_the_plan() {
		let table = TranslationTable::new();
		let cols = vec![col("shape", "polygon", "polygon", 1)];
		assert!(matches!(
			StanzaWidths::plan(&cols, &table, Nullability::Plain),
			Err(GenError::UnknownType(_))
		));
	}
}
