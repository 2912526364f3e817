//! Drives a generator run: category orchestration, duplicate suppression, and
//! file output

use std::{collections::HashSet, fs};

use tracing::{debug, error, info, warn};

use crate::{
	connection::CatalogClient,
	error::GenError,
	go_model::{render_file, ConvertToGo},
	ident,
	metadata::PsqlProc,
	pg_select_types::GetFunction,
	signature,
	translate::TranslationTable,
	Opt,
};

/// Admits each generated structure name once per run
///
/// The listing queries return one row per (object, grantee) pair when no
/// application user is named, and one row per overload sharing a function
/// name; whichever row arrives first wins and the rest are discarded.
#[derive(Debug, Default)]
pub struct Deduplicator {
	seen: HashSet<String>,
}

impl Deduplicator {
	pub fn new() -> Deduplicator {
		Deduplicator::default()
	}

	/// True the first time a name is seen in this run
	pub fn admit(&mut self, struct_name: &str) -> bool {
		self.seen.insert(struct_name.to_string())
	}
}

pub struct Generator<'a> {
	opt: &'a Opt,
	table: TranslationTable,
	/// Types and tables share one file namespace; function result files are
	/// prefixed and so get their own
	rel_seen: Deduplicator,
	func_seen: Deduplicator,
}

impl<'a> Generator<'a> {
	pub fn new(opt: &'a Opt) -> Generator<'a> {
		Generator {
			opt,
			table: TranslationTable::new(),
			rel_seen: Deduplicator::new(),
			func_seen: Deduplicator::new(),
		}
	}

	/// One sequential pass: domain bootstrap, then types, tables/views, and
	/// functions in that order. An `Err` from here means either a fatal
	/// failure or that at least one category had to be abandoned.
	pub fn run(&mut self, client: &mut CatalogClient) -> Result<(), GenError> {
		// populate the alias table before anything is translated
		for d in client.domain_aliases()? {
			self.table.add_domain(d.obj_name, d.type_name);
		}
		info!("server version {}", client.server_version());

		let mut failed: Vec<&'static str> = Vec::new();

		if self.opt.types {
			if let Err(e) = self.gen_types(client) {
				error!("user defined type generation failed: {}", e);
				failed.push("types");
			}
		}
		if self.opt.tables {
			if let Err(e) = self.gen_tables(client) {
				error!("table/view generation failed: {}", e);
				failed.push("tables/views");
			}
		}
		if self.opt.functions {
			if let Err(e) = self.gen_functions(client) {
				error!("function generation failed: {}", e);
				failed.push("functions");
			}
		}

		if failed.is_empty() {
			Ok(())
		} else {
			Err(GenError::Category(failed.join(", ")))
		}
	}

	fn gen_types(&mut self, client: &mut CatalogClient) -> Result<(), GenError> {
		let types = client.list_types(&self.opt.schema, &self.opt.objects)?;
		for mut t in types {
			t.cols = match client.type_columns(&t.schema, &t.name) {
				Ok(cols) => cols,
				Err(e) => {
					warn!("skipping type {}.{}: {}", t.schema, t.name, e);
					continue;
				},
			};
			if t.cols.is_empty() {
				continue;
			}
			if !self.rel_seen.admit(&t.struct_name) {
				continue;
			}
			match t.as_go_string(self.opt, &self.table) {
				Ok(block) => self.write_file(&t.struct_name, &block)?,
				Err(e) => warn!("skipping type {}.{}: {}", t.schema, t.name, e),
			}
		}
		Ok(())
	}

	fn gen_tables(&mut self, client: &mut CatalogClient) -> Result<(), GenError> {
		let tables = client.list_tables(&self.opt.schema, &self.opt.objects, &self.opt.app_user)?;
		for mut t in tables {
			t.cols = match client.table_columns(&t.schema, &t.name) {
				Ok(cols) => cols,
				Err(e) => {
					warn!("skipping {} {}.{}: {}", t.obj_type, t.schema, t.name, e);
					continue;
				},
			};
			if t.cols.is_empty() {
				continue;
			}
			if !self.rel_seen.admit(&t.struct_name) {
				continue;
			}
			match t.as_go_string(self.opt, &self.table) {
				Ok(block) => self.write_file(&t.struct_name, &block)?,
				Err(e) => warn!("skipping {} {}.{}: {}", t.obj_type, t.schema, t.name, e),
			}
		}
		Ok(())
	}

	fn gen_functions(&mut self, client: &mut CatalogClient) -> Result<(), GenError> {
		let funcs = client.list_functions(&self.opt.schema, &self.opt.objects, &self.opt.app_user)?;
		for f in funcs {
			let proc = match decompose(client, &f) {
				Ok(p) => p,
				Err(e) => {
					warn!("skipping function {}.{}: {}", f.schema_name, f.obj_name, e);
					continue;
				},
			};
			if !proc.wants_result_struct() {
				debug!(
					"function {}.{} returns at most one column, no struct needed",
					proc.schema, proc.name,
				);
				continue;
			}
			if !self.func_seen.admit(&proc.struct_name) {
				continue;
			}
			match proc.as_go_string(self.opt, &self.table) {
				Ok(block) => {
					let file_stem = format!("f{}", proc.struct_name);
					self.write_file(&file_stem, &block)?;
				},
				Err(e) => warn!("skipping function {}.{}: {}", proc.schema, proc.name, e),
			}
		}
		Ok(())
	}

	/// Buffers the whole file and writes it in one call, so a failure never
	/// leaves a half-written file behind
	fn write_file(&self, file_stem: &str, block: &str) -> Result<(), GenError> {
		let text = render_file(self.opt, block);
		let dir = self.opt.out_dir();
		fs::create_dir_all(&dir)?;
		let path = dir.join(format!("{}.go", file_stem));
		fs::write(&path, text)?;
		info!("wrote {}", path.display());
		Ok(())
	}
}

/// Builds the moded column lists for one function, preferring the positional
/// encoding and falling back to the formatted text lists
fn decompose(client: &mut CatalogClient, f: &GetFunction) -> Result<PsqlProc, GenError> {
	let (args, results) = match f.arg_types.as_deref() {
		Some(types) if !types.is_empty() => signature::decompose_positional(
			types,
			f.arg_modes.as_deref().unwrap_or(""),
			f.arg_names.as_deref().unwrap_or(""),
			client,
		)?,
		_ => signature::decompose_text(&f.argument_types, &f.result_types),
	};
	Ok(PsqlProc {
		struct_name: ident::upper_camel(&f.obj_name),
		schema: f.schema_name.clone(),
		name: f.obj_name.clone(),
		obj_kind: f.obj_kind.clone(),
		obj_type: f.obj_type.clone(),
		result_types: f.result_types.clone(),
		argument_types: f.argument_types.clone(),
		description: f.description.clone(),
		results,
		args,
	})
}
