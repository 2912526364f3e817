//! End to end rendering checks: metadata in, complete Go file text out

use structopt::StructOpt;

use pg_struct_mapper::{
	go_model::{render_file, ConvertToGo},
	metadata::{ColumnMeta, PsqlTable},
	translate::TranslationTable,
	Opt,
};

fn opt(extra: &[&str]) -> Opt {
	let mut argv = vec![
		"pg_struct_mapper",
		"-r",
		"-d",
		"salesdb",
		"-U",
		"generator",
		"--host",
		"db.internal",
		"--schema",
		"sales",
	];
	argv.extend_from_slice(extra);
	Opt::from_iter(argv)
}

fn customer_table() -> PsqlTable {
	let mut id = ColumnMeta {
		name: "id".to_string(),
		data_type: "integer".to_string(),
		type_name: "int4".to_string(),
		pos: 1,
		..ColumnMeta::default()
	};
	id.not_null = true;
	id.is_pk = true;
	let name = ColumnMeta {
		name: "name".to_string(),
		data_type: "text".to_string(),
		type_name: "text".to_string(),
		pos: 2,
		..ColumnMeta::default()
	};
	let created_at = ColumnMeta {
		name: "created_at".to_string(),
		data_type: "timestamp without time zone".to_string(),
		type_name: "timestamp".to_string(),
		pos: 3,
		..ColumnMeta::default()
	};
	PsqlTable {
		schema: "sales".to_string(),
		name: "customer".to_string(),
		obj_kind: "r".to_string(),
		obj_type: "table".to_string(),
		description: "Registered customers".to_string(),
		struct_name: "Customer".to_string(),
		cols: vec![id, name, created_at],
	}
}

#[test]
fn plain_policy_renders_aligned_marked_stanzas() {
	let opt = opt(&["--nullability", "plain"]);
	let table = TranslationTable::new();
	let text = customer_table().as_go_string(&opt, &table).unwrap();

	let lines: Vec<&str> = text.lines().collect();
	let id_line = lines.iter().find(|l| l.contains("db:\"id\"")).unwrap();
	let name_line = lines.iter().find(|l| l.contains("db:\"name\"")).unwrap();
	let created_line = lines.iter().find(|l| l.contains("db:\"created_at\"")).unwrap();

	// emission order follows ordinal position
	assert!(text.find("db:\"id\"").unwrap() < text.find("db:\"name\"").unwrap());
	assert!(text.find("db:\"name\"").unwrap() < text.find("db:\"created_at\"").unwrap());

	assert!(id_line.contains("[PK]"));
	assert!(id_line.contains("[Not Null]"));
	assert!(!name_line.contains("[PK]"));
	assert!(!name_line.contains("[Not Null]"));
	assert!(created_line.contains("// [timestamp without time zone]"));

	// the three stanzas share token columns: every annotation comment starts
	// at the same offset
	let comment_cols: Vec<usize> = [id_line, name_line, created_line]
		.iter()
		.map(|l| l.find("// [").unwrap())
		.collect();
	assert_eq!(comment_cols[0], comment_cols[1]);
	assert_eq!(comment_cols[1], comment_cols[2]);
}

#[test]
fn rendered_file_has_header_imports_and_list_fn() {
	let opt = opt(&[]);
	let table = TranslationTable::new();
	let block = customer_table().as_go_string(&opt, &table).unwrap();
	let text = render_file(&opt, &block);

	assert!(text.starts_with("package main\n"));
	assert!(text.contains("// Postgresql structs generated for the following:"));
	assert!(text.contains("// Host: db.internal"));
	assert!(text.contains("// Database: salesdb"));
	assert!(text.contains("// Schema: sales"));
	assert!(text.contains("// Generated structs for: tables/views"));

	// nullable policy: sql boxes in the struct, select straight into it
	assert!(text.contains("\"database/sql\""));
	assert!(text.contains("_ \"github.com/lib/pq\""));
	assert!(text.contains("sql.NullInt32"));
	assert!(text.contains("sql.NullTime"));
	assert!(text.contains("func (db *DB) ListCustomer() (d []Customer, err error) {"));
	assert!(text.contains("SELECT id,\n        name,\n        created_at\n    FROM sales.customer`,"));

	// object description rides along as a comment
	assert!(text.contains("// Registered customers"));
}

#[test]
fn plain_policy_file_imports_time_and_unwraps() {
	let opt = opt(&["--nullability", "plain"]);
	let table = TranslationTable::new();
	let block = customer_table().as_go_string(&opt, &table).unwrap();
	let text = render_file(&opt, &block);

	assert!(text.contains("\"time\""));
	assert!(text.contains("\"database/sql\""));
	assert!(text.contains("time.Time"));
	assert!(text.contains("var u []struct {"));
	assert!(text.contains("ID: rec.ID.Int32,"));
	assert!(text.contains("Name: rec.Name.String,"));
	assert!(text.contains("CreatedAt: rec.CreatedAt.Time,"));
}
