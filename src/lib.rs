//! Connects to a PostgreSQL database and generates Go struct definitions for
//! its tables, views, user defined types, and set returning functions
//!
//! Each generated file carries one struct whose fields mirror the columns of a
//! catalog object, aligned and tagged for `encoding/json` and `sqlx`-style
//! `db` scanning, with the native type, primary key, and NOT NULL facts kept
//! in a trailing comment.

pub mod connection;
pub mod error;
pub mod generator;
pub mod go_model;
pub mod ident;
pub mod metadata;
pub mod pg_select_types;
pub mod signature;
pub mod stanza;
pub mod translate;

use std::path::PathBuf;

use structopt::StructOpt;

pub use error::GenError;
use translate::Nullability;

#[derive(Debug, StructOpt)]
#[structopt(name = "pg_struct_mapper", about = "Generates Go structs from a PostgreSQL database")]
pub struct Opt {
	/// Generate structs for user defined types
	#[structopt(short = "t", long)]
	pub types: bool,

	/// Generate structs for tables and views
	#[structopt(short = "r", long)]
	pub tables: bool,

	/// Generate structs for result-set returning functions
	#[structopt(short = "f", long)]
	pub functions: bool,

	/// Field representation for the generated structs
	#[structopt(long, default_value = "nullable", possible_values = &["plain", "nullable"])]
	pub nullability: Nullability,

	/// The database schema to generate structs for (defaults to all)
	#[structopt(short = "s", long, default_value = "")]
	pub schema: String,

	/// Comma-separated list of database objects to generate structs for (defaults to all)
	#[structopt(short = "o", long, default_value = "")]
	pub objects: String,

	/// The application user; only objects this user has privileges for are generated
	#[structopt(short = "u", long = "app-user", default_value = "")]
	pub app_user: String,

	/// The package name for the generated files
	#[structopt(long, default_value = "main")]
	pub package: String,

	/// The directory to write generated files to (defaults to the package name)
	#[structopt(long, parse(from_os_str))]
	pub dir: Option<PathBuf>,

	/// The database name to connect to
	#[structopt(short = "d", long)]
	pub database: String,

	/// The database host to connect to
	#[structopt(long, default_value = "localhost")]
	pub host: String,

	/// The port to connect to
	#[structopt(short = "p", long, default_value = "5432")]
	pub port: u16,

	/// The database user to connect as
	#[structopt(short = "U", long = "user")]
	pub user: String,
}

impl Opt {
	pub fn out_dir(&self) -> PathBuf {
		self.dir
			.clone()
			.unwrap_or_else(|| PathBuf::from(&self.package))
	}

	/// The categories selected for generation, for the file header
	pub fn selected_categories(&self) -> Vec<&'static str> {
		let mut ary = Vec::new();
		if self.types {
			ary.push("user defined types");
		}
		if self.tables {
			ary.push("tables/views");
		}
		if self.functions {
			ary.push("functions");
		}
		ary
	}
}
