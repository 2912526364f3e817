//! Catalog access: one client, every statement prepared up front

use postgres::{Client, Config, NoTls, Statement};

use crate::{
	error::GenError,
	ident,
	metadata::{ColumnMeta, PsqlTable, PsqlUserType},
	pg_select_types::*,
	signature::TypeLookup,
	Opt,
};

/// Catalog versions from here on carry `pg_proc.prokind`
const PROKIND_VERSION: i32 = 110_000;

pub struct CatalogClient {
	client: Client,
	version: i32,
	domains_stmt: Statement,
	types_stmt: Statement,
	type_columns_stmt: Statement,
	tables_stmt: Statement,
	table_columns_stmt: Statement,
	functions_stmt: Statement,
	type_meta_stmt: Statement,
}

impl CatalogClient {
	/// Connects with the parameters from `opt`; `PGPASSWORD` is honored when
	/// the server demands one
	pub fn connect(opt: &Opt) -> Result<CatalogClient, GenError> {
		let mut config = Config::new();
		config
			.host(&opt.host)
			.port(opt.port)
			.user(&opt.user)
			.dbname(&opt.database);
		if let Ok(password) = std::env::var("PGPASSWORD") {
			config.password(password);
		}
		CatalogClient::new(config.connect(NoTls)?)
	}

	/// Probes the server version (doubling as the health check) and prepares
	/// every catalog statement; the function listing variant is picked here so
	/// nothing downstream ever branches on the catalog version
	pub fn new(mut client: Client) -> Result<CatalogClient, GenError> {
		let version: i32 = client.query_one(GET_SERVER_VERSION, &[])?.try_get(0)?;
		let functions_sql = if version >= PROKIND_VERSION {
			GET_FUNCTIONS
		} else {
			GET_FUNCTIONS_PRE_11
		};

		Ok(CatalogClient {
			version,
			domains_stmt: client.prepare(GET_DOMAINS)?,
			types_stmt: client.prepare(GET_TYPES)?,
			type_columns_stmt: client.prepare(GET_TYPE_COLUMNS)?,
			tables_stmt: client.prepare(GET_TABLES)?,
			table_columns_stmt: client.prepare(GET_TABLE_COLUMNS)?,
			functions_stmt: client.prepare(functions_sql)?,
			type_meta_stmt: client.prepare(GET_TYPE_META)?,
			client,
		})
	}

	pub fn server_version(&self) -> i32 {
		self.version
	}

	/// The one-time full scan feeding the domain alias table
	pub fn domain_aliases(&mut self) -> Result<Vec<GetDomain>, GenError> {
		let rows = self.client.query(&self.domains_stmt, &[])?;
		let aliases = rows
			.iter()
			.map(GetDomain::from_row)
			.collect::<Result<Vec<_>, _>>()?;
		Ok(aliases)
	}

	/// Lists user defined composite types; columns are fetched per object
	pub fn list_types(&mut self, schema: &str, objects: &str) -> Result<Vec<PsqlUserType>, GenError> {
		let rows = self.client.query(&self.types_stmt, &[&schema, &objects])?;
		rows.iter()
			.map(|row| {
				let t = GetType::from_row(row)?;
				Ok(PsqlUserType {
					struct_name: ident::upper_camel(&t.obj_name),
					schema: t.schema_name,
					name: t.obj_name,
					obj_type: t.obj_type,
					description: t.description,
					cols: Vec::new(),
				})
			})
			.collect()
	}

	pub fn type_columns(&mut self, schema: &str, obj_name: &str) -> Result<Vec<ColumnMeta>, GenError> {
		let rows = self.client.query(&self.type_columns_stmt, &[&schema, &obj_name])?;
		rows.iter()
			.map(|row| Ok(GetColumn::from_row(row)?.into()))
			.collect()
	}

	/// Lists tables and views visible to `user` (empty is unrestricted); one
	/// row per grantee when unrestricted, which the deduplicator collapses
	pub fn list_tables(
		&mut self,
		schema: &str,
		objects: &str,
		user: &str,
	) -> Result<Vec<PsqlTable>, GenError> {
		let rows = self.client.query(&self.tables_stmt, &[&schema, &objects, &user])?;
		rows.iter()
			.map(|row| {
				let t = GetRelation::from_row(row)?;
				Ok(PsqlTable {
					struct_name: ident::upper_camel(&t.obj_name),
					schema: t.schema_name,
					name: t.obj_name,
					obj_kind: t.obj_kind,
					obj_type: t.obj_type,
					description: t.description,
					cols: Vec::new(),
				})
			})
			.collect()
	}

	pub fn table_columns(&mut self, schema: &str, obj_name: &str) -> Result<Vec<ColumnMeta>, GenError> {
		let rows = self.client.query(&self.table_columns_stmt, &[&schema, &obj_name])?;
		rows.iter()
			.map(|row| Ok(GetColumn::from_row(row)?.into()))
			.collect()
	}

	/// Lists functions with their raw signature encodings; decomposition into
	/// moded columns happens in the generator
	pub fn list_functions(
		&mut self,
		schema: &str,
		objects: &str,
		user: &str,
	) -> Result<Vec<GetFunction>, GenError> {
		let rows = self.client.query(&self.functions_stmt, &[&schema, &objects, &user])?;
		let funcs = rows
			.iter()
			.map(GetFunction::from_row)
			.collect::<Result<Vec<_>, _>>()?;
		Ok(funcs)
	}
}

impl From<GetColumn> for ColumnMeta {
	fn from(c: GetColumn) -> ColumnMeta {
		ColumnMeta {
			name: c.column_name,
			data_type: c.data_type,
			type_name: c.type_name,
			type_category: c.type_category,
			pos: c.ordinal_position,
			not_null: c.is_required,
			is_pk: c.is_pk,
			description: c.description,
		}
	}
}

impl TypeLookup for CatalogClient {
	fn type_meta(&mut self, type_id: &str) -> Result<Option<ColumnMeta>, GenError> {
		let row = self.client.query_opt(&self.type_meta_stmt, &[&type_id])?;
		let meta = row.as_ref().map(GetTypeMeta::from_row).transpose()?;
		Ok(meta.map(|m| ColumnMeta {
			data_type: m.data_type,
			type_name: m.type_name,
			type_category: m.type_category,
			..ColumnMeta::default()
		}))
	}
}
