//! Renders catalog metadata as Go source text

use crate::{
	error::GenError,
	ident,
	metadata::{ColumnMeta, PsqlProc, PsqlTable, PsqlUserType},
	stanza::{self, StanzaWidths},
	translate::{Nullability, TranslationTable},
	Opt,
};

/// Takes a reference to a metadata record and renders the Go declarations for
/// it, one block per catalog object
pub trait ConvertToGo {
	fn as_go_string(&self, opt: &Opt, table: &TranslationTable) -> Result<String, GenError>;
}

impl ConvertToGo for PsqlUserType {
	/// ```text
	/// // MyType struct for the schema.my_type tuple type
	/// type MyType struct {
	/// 	...aligned stanzas...
	/// }
	/// ```
	fn as_go_string(&self, opt: &Opt, table: &TranslationTable) -> Result<String, GenError> {
		let mut lines = vec![format!(
			"// {} struct for the {}.{} {} type",
			self.struct_name, self.schema, self.name, self.obj_type,
		)];
		push_description(&mut lines, &self.description);
		lines.push(format!("type {} struct {{", self.struct_name));
		lines.push(struct_stanzas(&self.cols, table, opt.nullability)?);
		lines.push("}".to_string());
		Ok(lines.join("\n"))
	}
}

impl ConvertToGo for PsqlTable {
	/// The struct block followed by a `List` accessor reading the whole
	/// relation in column order
	fn as_go_string(&self, opt: &Opt, table: &TranslationTable) -> Result<String, GenError> {
		let mut lines = vec![format!(
			"// {} struct for the {}.{} {}",
			self.struct_name, self.schema, self.name, self.obj_type,
		)];
		push_description(&mut lines, &self.description);
		lines.push(format!("type {} struct {{", self.struct_name));
		lines.push(struct_stanzas(&self.cols, table, opt.nullability)?);
		lines.push("}".to_string());
		lines.push(list_fn(self, opt, table)?);
		Ok(lines.join("\n"))
	}
}

impl ConvertToGo for PsqlProc {
	/// Only the result columns appear in a function's struct; the caller is
	/// expected to have checked [`PsqlProc::wants_result_struct`] first
	fn as_go_string(&self, opt: &Opt, table: &TranslationTable) -> Result<String, GenError> {
		let mut lines = vec![format!(
			"// {} struct for the result set from the {}.{} function",
			self.struct_name, self.schema, self.name,
		)];
		push_description(&mut lines, &self.description);
		lines.push(format!("type {} struct {{", self.struct_name));
		lines.push(struct_stanzas(&self.results, table, opt.nullability)?);
		lines.push("}".to_string());
		Ok(lines.join("\n"))
	}
}

fn push_description(lines: &mut Vec<String>, description: &str) {
	if !description.is_empty() {
		lines.push(format!("// {}", description.replace('\n', "\n// ")));
	}
}

fn struct_stanzas(
	cols: &[ColumnMeta],
	table: &TranslationTable,
	policy: Nullability,
) -> Result<String, GenError> {
	let widths = StanzaWidths::plan(cols, table, policy)?;
	let rendered = cols
		.iter()
		.map(|col| stanza::render(col, &widths, table, policy))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(rendered.join("\n"))
}

/// Generates `func (db *DB) ListX() ([]X, error)` for a table or view
///
/// Under the plain policy the rows are read into an internal nullable-wrapped
/// struct and unwrapped field by field on assignment; under the nullable
/// policy the select reads straight into the public struct
fn list_fn(t: &PsqlTable, opt: &Opt, table: &TranslationTable) -> Result<String, GenError> {
	let fn_name = format!("List{}", t.struct_name);
	let mut lines = vec![
		String::new(),
		format!(
			"// {} returns the data from the {}.{} {}",
			fn_name, t.schema, t.name, t.obj_type,
		),
		format!("func (db *DB) {}() (d []{}, err error) {{", fn_name, t.struct_name),
	];

	if opt.nullability == Nullability::Plain {
		let widths = StanzaWidths::plan(&t.cols, table, Nullability::Nullable)?;
		lines.push("\tvar u []struct {".to_string());
		for col in &t.cols {
			lines.push(stanza::render_internal(col, &widths, table)?);
		}
		lines.push("\t}".to_string());
		lines.push("\terr = db.Select(&u, `".to_string());
		lines.push(select_text(t));
		lines.push("\t)".to_string());
		lines.push("\tfor _, rec := range u {".to_string());
		lines.push(format!("\t\td = append(d, {}{{", t.struct_name));
		for col in &t.cols {
			let field = ident::upper_camel(&col.name);
			let plain = table.translate(&col.type_name, Nullability::Plain)?;
			let accessor = table.translate(&col.type_name, Nullability::Accessor)?;
			// a conversion is only needed where the box is wider than the
			// field, e.g. real read back through sql.NullFloat64
			let value = if plain == accessor_go_type(accessor) {
				format!("rec.{}.{}", field, accessor)
			} else {
				format!("{}(rec.{}.{})", plain, field, accessor)
			};
			lines.push(format!("\t\t\t{}: {},", field, value));
		}
		lines.push("\t\t})".to_string());
		lines.push("\t}".to_string());
	} else {
		lines.push("\terr = db.Select(&d, `".to_string());
		lines.push(select_text(t));
		lines.push("\t)".to_string());
	}

	lines.push("\treturn".to_string());
	lines.push("}".to_string());
	Ok(lines.join("\n"))
}

fn select_text(t: &PsqlTable) -> String {
	let cols: Vec<&str> = t.cols.iter().map(|c| c.name.as_str()).collect();
	format!(
		"SELECT {}\n    FROM {}.{}`,",
		cols.join(",\n        "),
		t.schema,
		t.name,
	)
}

/// The Go type an accessor selector produces, for deciding whether an unwrap
/// needs a conversion
fn accessor_go_type(accessor: &str) -> String {
	match accessor {
		"Time" => "time.Time".to_string(),
		other => other.to_lowercase(),
	}
}

/// Wraps one rendered block in the per-file header: package clause, provenance
/// comments, and an import block derived from what the block references
pub fn render_file(opt: &Opt, block: &str) -> String {
	let mut lines = vec![
		format!("package {}", opt.package),
		String::new(),
		"// Postgresql structs generated for the following:".to_string(),
		format!("// Host: {}", opt.host),
		format!("// Database: {}", opt.database),
	];
	if !opt.schema.is_empty() {
		lines.push(format!("// Schema: {}", opt.schema));
	}
	if !opt.objects.is_empty() {
		lines.push(format!("// Object Name: {}", opt.objects));
	}
	if !opt.app_user.is_empty() {
		lines.push(format!("// App user: {}", opt.app_user));
	}
	lines.push(format!(
		"// Generated structs for: {}",
		opt.selected_categories().join(", "),
	));

	let imports = go_imports(block);
	if !imports.is_empty() {
		lines.push(String::new());
		lines.push(imports);
	}
	lines.push(String::new());
	lines.push(block.to_string());
	lines.push(String::new());
	lines.join("\n")
}

/// Go rejects unused imports, so the block only names what the body uses
fn go_imports(block: &str) -> String {
	let mut std_imports = Vec::new();
	if block.contains("sql.Null") {
		std_imports.push("\t\"database/sql\"");
	}
	if block.contains("time.Time") {
		std_imports.push("\t\"time\"");
	}
	let wants_pq = block.contains("db.Select");
	if std_imports.is_empty() && !wants_pq {
		return String::new();
	}

	let mut s = String::from("import (\n");
	s += &std_imports.join("\n");
	if wants_pq {
		if !std_imports.is_empty() {
			s += "\n";
		}
		s += "\n\t_ \"github.com/lib/pq\"";
	}
	s += "\n)";
	s
}
