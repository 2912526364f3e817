//! Select statements into the pg_catalog views and their row types
//!
//! Every filter lives here: schema and object name lists arrive as `$1`/`$2`
//! (empty means all) and the application user as `$3` (empty means
//! unrestricted), so the callers never re-filter rows. The one row per
//! (object, grantee) multiplicity of the ACL unnest is deliberate and handled
//! downstream by the deduplicator.

use postgres::{Error, Row};

/// Converts from a catalog [`Row`]; the field order of each struct matches the
/// column order of its statement
pub trait TryFromRow: Sized {
	fn from_row(row: &Row) -> Result<Self, Error>;
}

/// Server version probe, also the post-connect health check
pub const GET_SERVER_VERSION: &str = "SELECT current_setting('server_version_num')::int";

pub const GET_DOMAINS: &str = "SELECT t.typname::text AS obj_name,
        ltrim ( bt.typname::text, '_' ) AS type_name
    FROM pg_catalog.pg_type t
    JOIN pg_catalog.pg_type bt
        ON bt.oid = t.typbasetype
    JOIN pg_catalog.pg_namespace n
        ON n.oid = t.typnamespace
    WHERE t.typtype = 'd'
        AND n.nspname <> 'pg_catalog'
        AND n.nspname <> 'information_schema'
        AND n.nspname !~ '^pg_toast'
    ORDER BY t.typname";
#[derive(Debug)]
pub struct GetDomain {
	pub obj_name: String,
	pub type_name: String,
}
impl TryFromRow for GetDomain {
	fn from_row(row: &Row) -> Result<Self, Error> {
		Ok(GetDomain {
			obj_name: row.try_get(0)?,
			type_name: row.try_get(1)?,
		})
	}
}

pub const GET_TYPES: &str = "WITH args AS (
    SELECT $1::text AS schema_name,
            regexp_split_to_table ( $2::text, ', *' ) AS obj_name
)
SELECT n.nspname::text AS schema_name,
        pg_catalog.format_type ( t.oid, NULL ) AS obj_name,
        CASE
            WHEN t.typrelid != 0 THEN CAST ( 'tuple' AS pg_catalog.text )
            WHEN t.typlen < 0 THEN CAST ( 'var' AS pg_catalog.text )
            ELSE CAST ( t.typlen AS pg_catalog.text )
            END AS obj_type,
        coalesce ( pg_catalog.obj_description ( t.oid, 'pg_type' ), '' ) AS description
    FROM pg_catalog.pg_type t
    JOIN pg_catalog.pg_namespace n
        ON n.oid = t.typnamespace
    CROSS JOIN args
    WHERE t.typtype = 'c'
        AND ( t.typrelid = 0
            OR ( SELECT c.relkind = 'c'
                    FROM pg_catalog.pg_class c
                    WHERE c.oid = t.typrelid ) )
        AND NOT EXISTS (
                SELECT 1
                    FROM pg_catalog.pg_type el
                    WHERE el.oid = t.typelem
                    AND el.typarray = t.oid )
        AND n.nspname <> 'pg_catalog'
        AND n.nspname <> 'information_schema'
        AND n.nspname !~ '^pg_toast'
        AND ( n.nspname = args.schema_name
            OR args.schema_name = '' )
        AND ( pg_catalog.format_type ( t.oid, NULL ) = args.obj_name
            OR coalesce ( args.obj_name, '' ) = '' )
    ORDER BY n.nspname,
        pg_catalog.format_type ( t.oid, NULL )";
#[derive(Debug)]
pub struct GetType {
	pub schema_name: String,
	pub obj_name: String,
	pub obj_type: String,
	pub description: String,
}
impl TryFromRow for GetType {
	fn from_row(row: &Row) -> Result<Self, Error> {
		Ok(GetType {
			schema_name: row.try_get(0)?,
			obj_name: row.try_get(1)?,
			obj_type: row.try_get(2)?,
			description: row.try_get(3)?,
		})
	}
}

pub const GET_TYPE_COLUMNS: &str = "WITH args AS (
    SELECT $1::text AS schema_name,
            $2::text AS obj_name
)
SELECT a.attname::text AS column_name,
        pg_catalog.format_type ( a.atttypid, a.atttypmod ) AS data_type,
        ltrim ( tc.typname::text, '_' ) AS type_name,
        tc.typcategory::text AS type_category,
        a.attnum::int AS ordinal_position,
        a.attnotnull AS is_required,
        false AS is_pk,
        coalesce ( pg_catalog.col_description ( a.attrelid, a.attnum ), '' ) AS description
    FROM pg_catalog.pg_attribute a
    JOIN pg_catalog.pg_type tt
        ON a.attrelid = tt.typrelid
    JOIN pg_catalog.pg_type tc
        ON a.atttypid = tc.oid
    JOIN pg_catalog.pg_namespace n
        ON n.oid = tt.typnamespace
    CROSS JOIN args
    WHERE tt.typtype = 'c'
        AND a.attnum > 0
        AND NOT a.attisdropped
        AND n.nspname = args.schema_name
        AND pg_catalog.format_type ( tt.oid, NULL ) = args.obj_name
    ORDER BY a.attnum";

pub const GET_TABLES: &str = "WITH args AS (
    SELECT $1::text AS schema_name,
            regexp_split_to_table ( $2::text, ', *' ) AS obj_name,
            $3::text AS username
),
rel AS (
    SELECT c.oid,
            n.nspname::text AS schema_name,
            c.relname::text AS obj_name,
            c.relkind::text AS obj_kind,
            CASE c.relkind
                WHEN 'r' THEN 'table'
                WHEN 'p' THEN 'table'
                WHEN 'v' THEN 'view'
                WHEN 'm' THEN 'materialized view'
                WHEN 'f' THEN 'foreign table'
                END AS obj_type,
            pg_catalog.obj_description ( c.oid, 'pg_class' ) AS description,
            c.relacl
        FROM pg_catalog.pg_class c
        JOIN pg_catalog.pg_namespace n
            ON n.oid = c.relnamespace
        CROSS JOIN args
        WHERE c.relkind IN ( 'r', 'p', 'v', 'm', 'f' )
            AND n.nspname <> 'pg_catalog'
            AND n.nspname <> 'information_schema'
            AND n.nspname !~ '^pg_toast'
            AND ( n.nspname = args.schema_name
                OR args.schema_name = '' )
            AND ( c.relname = args.obj_name
                OR coalesce ( args.obj_name, '' ) = '' )
),
obj AS (
    SELECT rel.schema_name,
            rel.obj_name,
            rel.obj_kind,
            rel.obj_type,
            rel.description,
            coalesce ( a.acl::text, '' ) AS acl
        FROM rel
        LEFT JOIN (
            SELECT oid,
                    unnest ( relacl ) AS acl
                FROM rel
            ) a
            ON a.oid = rel.oid
)
SELECT DISTINCT obj.schema_name,
        obj.obj_name,
        obj.obj_kind,
        obj.obj_type,
        CASE
            WHEN args.username = '' THEN ''
            ELSE coalesce ( regexp_replace ( regexp_replace ( obj.acl, '^[^=]+=', '' ), '[/].+', '' ), '' )
            END AS privs,
        coalesce ( obj.description, '' ) AS description
    FROM obj
    CROSS JOIN args
    WHERE ( obj.acl LIKE args.username || '=%'
            OR args.username = '' )
    ORDER BY 1, 2";
#[derive(Debug)]
pub struct GetRelation {
	pub schema_name: String,
	pub obj_name: String,
	pub obj_kind: String,
	pub obj_type: String,
	pub privs: String,
	pub description: String,
}
impl TryFromRow for GetRelation {
	fn from_row(row: &Row) -> Result<Self, Error> {
		Ok(GetRelation {
			schema_name: row.try_get(0)?,
			obj_name: row.try_get(1)?,
			obj_kind: row.try_get(2)?,
			obj_type: row.try_get(3)?,
			privs: row.try_get(4)?,
			description: row.try_get(5)?,
		})
	}
}

pub const GET_TABLE_COLUMNS: &str = "WITH args AS (
    SELECT $1::text AS schema_name,
            $2::text AS obj_name
),
cols AS (
    SELECT n.nspname::text AS schema_name,
            c.relname::text AS obj_name,
            a.attname::text AS column_name,
            pg_catalog.format_type ( a.atttypid, a.atttypmod ) AS data_type,
            ltrim ( t.typname::text, '_' ) AS type_name,
            t.typcategory::text AS type_category,
            a.attnum::int AS ordinal_position,
            a.attnotnull AS is_required,
            pg_catalog.col_description ( a.attrelid, a.attnum ) AS description
        FROM pg_catalog.pg_attribute a
        JOIN pg_catalog.pg_class c
            ON c.oid = a.attrelid
        JOIN pg_catalog.pg_namespace n
            ON n.oid = c.relnamespace
        JOIN pg_catalog.pg_type t
            ON t.oid = a.atttypid
        CROSS JOIN args
        WHERE a.attnum > 0
            AND NOT a.attisdropped
            AND n.nspname = args.schema_name
            AND c.relname = args.obj_name
),
pk AS (
    SELECT nr.nspname::text AS schema_name,
            r.relname::text AS obj_name,
            regexp_split_to_table ( split_part ( split_part ( pg_get_constraintdef ( con.oid ), '(', 2 ), ')', 1 ), ', +' ) AS column_name
        FROM pg_class r
        JOIN pg_namespace nr
            ON nr.oid = r.relnamespace
        JOIN pg_constraint con
            ON con.conrelid = r.oid
        WHERE r.relkind = 'r'
            AND con.contype = 'p'
)
SELECT cols.column_name,
        cols.data_type,
        cols.type_name,
        cols.type_category,
        cols.ordinal_position,
        cols.is_required,
        pk.column_name IS NOT NULL AS is_pk,
        coalesce ( cols.description, '' ) AS description
    FROM cols
    LEFT JOIN pk
        ON ( pk.schema_name = cols.schema_name
            AND pk.obj_name = cols.obj_name
            AND pk.column_name = cols.column_name )
    ORDER BY cols.ordinal_position";
#[derive(Debug)]
pub struct GetColumn {
	pub column_name: String,
	pub data_type: String,
	pub type_name: String,
	pub type_category: String,
	pub ordinal_position: i32,
	pub is_required: bool,
	pub is_pk: bool,
	pub description: String,
}
impl TryFromRow for GetColumn {
	fn from_row(row: &Row) -> Result<Self, Error> {
		Ok(GetColumn {
			column_name: row.try_get(0)?,
			data_type: row.try_get(1)?,
			type_name: row.try_get(2)?,
			type_category: row.try_get(3)?,
			ordinal_position: row.try_get(4)?,
			is_required: row.try_get(5)?,
			is_pk: row.try_get(6)?,
			description: row.try_get(7)?,
		})
	}
}

/// Function listing for catalogs at or past the `prokind` threshold. The
/// `arg_types`/`arg_modes`/`arg_names` columns are the positional lists the
/// signature decomposer consumes; the CASE ladder folds a scalar return into
/// them as a trailing output position.
pub const GET_FUNCTIONS: &str = "WITH args AS (
    SELECT $1::text AS schema_name,
            regexp_split_to_table ( $2::text, ', *' ) AS obj_name,
            $3::text AS username
),
proc AS (
    SELECT p.oid,
            n.nspname::text AS schema_name,
            p.proname::text AS obj_name,
            p.prokind::text AS obj_kind,
            CASE p.prokind
                WHEN 'p' THEN 'procedure'
                WHEN 'f' THEN 'function'
                END AS obj_type,
            pg_catalog.pg_get_function_result ( p.oid ) AS result_types,
            pg_catalog.pg_get_function_arguments ( p.oid ) AS argument_types,
            pg_catalog.obj_description ( p.oid, 'pg_proc' ) AS description,
            p.proacl,
            CASE
                WHEN p.proallargtypes IS NOT NULL
                    THEN regexp_replace ( p.proallargtypes::text, '[{}]', '', 'g' )
                END AS all_arg_types,
            CASE
                WHEN p.proargmodes IS NOT NULL
                    THEN regexp_replace ( p.proargmodes::text, '[{}]', '', 'g' )
                END AS all_arg_modes,
            CASE
                WHEN p.proargnames IS NOT NULL
                    THEN regexp_replace ( p.proargnames::text, '[{}]', '', 'g' )
                END AS all_arg_names,
            CASE
                WHEN p.proargtypes IS NOT NULL AND p.proargtypes::text <> ''
                    THEN regexp_replace ( p.proargtypes::text, '[ ]+', ',', 'g' )
                END AS in_arg_types,
            CASE
                WHEN p.proargtypes IS NOT NULL AND p.proargtypes::text <> ''
                    THEN regexp_replace ( regexp_replace ( p.proargtypes::text, '[^ ]+', 'i', 'g' ), '[ ]+', ',', 'g' )
                END AS in_arg_modes,
            CASE
                WHEN p.prorettype IS NOT NULL AND p.prorettype::text <> ''
                    THEN p.prorettype::text
                END AS ret_arg_type,
            CASE
                WHEN t.typname IS NOT NULL AND t.typname::text <> ''
                    THEN t.typname::text
                END AS ret_arg_name
        FROM pg_catalog.pg_proc p
        JOIN pg_catalog.pg_namespace n
            ON n.oid = p.pronamespace
        LEFT JOIN pg_catalog.pg_type t
            ON t.oid = p.prorettype
        CROSS JOIN args
        WHERE p.prokind IN ( 'f', 'p' )
            AND NOT p.prorettype = 'pg_catalog.trigger'::pg_catalog.regtype
            AND n.nspname <> 'pg_catalog'
            AND n.nspname <> 'information_schema'
            AND n.nspname !~ '^pg_toast'
            AND ( n.nspname = args.schema_name
                OR args.schema_name = '' )
            AND ( p.proname = args.obj_name
                OR coalesce ( args.obj_name, '' ) = '' )
),
obj AS (
    SELECT p.schema_name,
            p.obj_name,
            p.obj_kind,
            p.obj_type,
            p.result_types,
            p.argument_types,
            p.description,
            coalesce ( a.acl::text, '' ) AS acl,
            CASE
                WHEN coalesce ( p.all_arg_types, '' ) <> '' THEN p.all_arg_types
                WHEN coalesce ( p.in_arg_types, '' ) <> '' AND coalesce ( p.ret_arg_type, '' ) <> '' THEN p.in_arg_types || ',' || p.ret_arg_type
                WHEN coalesce ( p.in_arg_types, '' ) <> '' THEN p.in_arg_types
                WHEN coalesce ( p.ret_arg_type, '' ) <> '' THEN p.ret_arg_type
                END AS arg_types,
            CASE
                WHEN coalesce ( p.all_arg_types, '' ) <> '' THEN p.all_arg_modes
                WHEN coalesce ( p.in_arg_types, '' ) <> '' AND coalesce ( p.ret_arg_type, '' ) <> '' THEN p.in_arg_modes || ',o'
                WHEN coalesce ( p.in_arg_types, '' ) <> '' THEN p.in_arg_modes
                WHEN coalesce ( p.ret_arg_type, '' ) <> '' THEN 'o'
                END AS arg_modes,
            CASE
                WHEN coalesce ( p.all_arg_types, '' ) <> '' THEN p.all_arg_names
                WHEN coalesce ( p.in_arg_types, '' ) <> '' AND coalesce ( p.ret_arg_type, '' ) <> '' THEN p.all_arg_names || ',' || p.ret_arg_name
                WHEN coalesce ( p.in_arg_types, '' ) <> '' THEN p.all_arg_names
                WHEN coalesce ( p.ret_arg_type, '' ) <> '' THEN p.ret_arg_name
                END AS arg_names
        FROM proc p
        LEFT JOIN (
            SELECT oid,
                    unnest ( proacl ) AS acl
                FROM proc
            ) a
            ON a.oid = p.oid
)
SELECT DISTINCT obj.schema_name,
        obj.obj_name,
        obj.obj_kind,
        obj.obj_type,
        coalesce ( obj.result_types, '' ) AS result_types,
        coalesce ( obj.argument_types, '' ) AS argument_types,
        CASE
            WHEN args.username = '' THEN ''
            ELSE coalesce ( regexp_replace ( regexp_replace ( obj.acl, '^[^=]+=', '' ), '[/].+', '' ), '' )
            END AS privs,
        coalesce ( obj.description, '' ) AS description,
        arg_types,
        arg_modes,
        arg_names
    FROM obj
    CROSS JOIN args
    WHERE ( obj.acl LIKE args.username || '=%'
            OR args.username = '' )
    ORDER BY 1, 2, 4";

/// Pre-11 variant: `prokind` does not exist yet, aggregates and window
/// functions are flagged on dedicated columns instead
pub const GET_FUNCTIONS_PRE_11: &str = "WITH args AS (
    SELECT $1::text AS schema_name,
            regexp_split_to_table ( $2::text, ', *' ) AS obj_name,
            $3::text AS username
),
proc AS (
    SELECT p.oid,
            n.nspname::text AS schema_name,
            p.proname::text AS obj_name,
            pg_catalog.pg_get_function_result ( p.oid ) AS result_types,
            pg_catalog.pg_get_function_arguments ( p.oid ) AS argument_types,
            pg_catalog.obj_description ( p.oid, 'pg_proc' ) AS description,
            p.proacl,
            CASE
                WHEN p.proallargtypes IS NOT NULL
                    THEN regexp_replace ( p.proallargtypes::text, '[{}]', '', 'g' )
                END AS all_arg_types,
            CASE
                WHEN p.proargmodes IS NOT NULL
                    THEN regexp_replace ( p.proargmodes::text, '[{}]', '', 'g' )
                END AS all_arg_modes,
            CASE
                WHEN p.proargnames IS NOT NULL
                    THEN regexp_replace ( p.proargnames::text, '[{}]', '', 'g' )
                END AS all_arg_names,
            CASE
                WHEN p.proargtypes IS NOT NULL AND p.proargtypes::text <> ''
                    THEN regexp_replace ( p.proargtypes::text, '[ ]+', ',', 'g' )
                END AS in_arg_types,
            CASE
                WHEN p.proargtypes IS NOT NULL AND p.proargtypes::text <> ''
                    THEN regexp_replace ( regexp_replace ( p.proargtypes::text, '[^ ]+', 'i', 'g' ), '[ ]+', ',', 'g' )
                END AS in_arg_modes,
            CASE
                WHEN p.prorettype IS NOT NULL AND p.prorettype::text <> ''
                    THEN p.prorettype::text
                END AS ret_arg_type,
            CASE
                WHEN t.typname IS NOT NULL AND t.typname::text <> ''
                    THEN t.typname::text
                END AS ret_arg_name
        FROM pg_catalog.pg_proc p
        JOIN pg_catalog.pg_namespace n
            ON n.oid = p.pronamespace
        LEFT JOIN pg_catalog.pg_type t
            ON t.oid = p.prorettype
        CROSS JOIN args
        WHERE NOT p.proisagg
            AND NOT p.proiswindow
            AND NOT p.prorettype = 'pg_catalog.trigger'::pg_catalog.regtype
            AND n.nspname <> 'pg_catalog'
            AND n.nspname <> 'information_schema'
            AND n.nspname !~ '^pg_toast'
            AND ( n.nspname = args.schema_name
                OR args.schema_name = '' )
            AND ( p.proname = args.obj_name
                OR coalesce ( args.obj_name, '' ) = '' )
),
obj AS (
    SELECT p.schema_name,
            p.obj_name,
            'f' AS obj_kind,
            'function' AS obj_type,
            p.result_types,
            p.argument_types,
            p.description,
            coalesce ( a.acl::text, '' ) AS acl,
            CASE
                WHEN coalesce ( p.all_arg_types, '' ) <> '' THEN p.all_arg_types
                WHEN coalesce ( p.in_arg_types, '' ) <> '' AND coalesce ( p.ret_arg_type, '' ) <> '' THEN p.in_arg_types || ',' || p.ret_arg_type
                WHEN coalesce ( p.in_arg_types, '' ) <> '' THEN p.in_arg_types
                WHEN coalesce ( p.ret_arg_type, '' ) <> '' THEN p.ret_arg_type
                END AS arg_types,
            CASE
                WHEN coalesce ( p.all_arg_types, '' ) <> '' THEN p.all_arg_modes
                WHEN coalesce ( p.in_arg_types, '' ) <> '' AND coalesce ( p.ret_arg_type, '' ) <> '' THEN p.in_arg_modes || ',o'
                WHEN coalesce ( p.in_arg_types, '' ) <> '' THEN p.in_arg_modes
                WHEN coalesce ( p.ret_arg_type, '' ) <> '' THEN 'o'
                END AS arg_modes,
            CASE
                WHEN coalesce ( p.all_arg_types, '' ) <> '' THEN p.all_arg_names
                WHEN coalesce ( p.in_arg_types, '' ) <> '' AND coalesce ( p.ret_arg_type, '' ) <> '' THEN p.all_arg_names || ',' || p.ret_arg_name
                WHEN coalesce ( p.in_arg_types, '' ) <> '' THEN p.all_arg_names
                WHEN coalesce ( p.ret_arg_type, '' ) <> '' THEN p.ret_arg_name
                END AS arg_names
        FROM proc p
        LEFT JOIN (
            SELECT oid,
                    unnest ( proacl ) AS acl
                FROM proc
            ) a
            ON a.oid = p.oid
)
SELECT DISTINCT obj.schema_name,
        obj.obj_name,
        obj.obj_kind,
        obj.obj_type,
        coalesce ( obj.result_types, '' ) AS result_types,
        coalesce ( obj.argument_types, '' ) AS argument_types,
        CASE
            WHEN args.username = '' THEN ''
            ELSE coalesce ( regexp_replace ( regexp_replace ( obj.acl, '^[^=]+=', '' ), '[/].+', '' ), '' )
            END AS privs,
        coalesce ( obj.description, '' ) AS description,
        arg_types,
        arg_modes,
        arg_names
    FROM obj
    CROSS JOIN args
    WHERE ( obj.acl LIKE args.username || '=%'
            OR args.username = '' )
    ORDER BY 1, 2, 4";
#[derive(Debug)]
pub struct GetFunction {
	pub schema_name: String,
	pub obj_name: String,
	pub obj_kind: String,
	pub obj_type: String,
	pub result_types: String,
	pub argument_types: String,
	pub privs: String,
	pub description: String,
	pub arg_types: Option<String>,
	pub arg_modes: Option<String>,
	pub arg_names: Option<String>,
}
impl TryFromRow for GetFunction {
	fn from_row(row: &Row) -> Result<Self, Error> {
		Ok(GetFunction {
			schema_name: row.try_get(0)?,
			obj_name: row.try_get(1)?,
			obj_kind: row.try_get(2)?,
			obj_type: row.try_get(3)?,
			result_types: row.try_get(4)?,
			argument_types: row.try_get(5)?,
			privs: row.try_get(6)?,
			description: row.try_get(7)?,
			arg_types: row.try_get(8)?,
			arg_modes: row.try_get(9)?,
			arg_names: row.try_get(10)?,
		})
	}
}

/// Resolves one positional type identifier to its native type metadata
pub const GET_TYPE_META: &str = "SELECT pg_catalog.format_type ( oid, NULL ) AS data_type,
        ltrim ( typname::text, '_' ) AS type_name,
        typcategory::text AS type_category
    FROM pg_catalog.pg_type
    WHERE oid::text = $1::text";
#[derive(Debug)]
pub struct GetTypeMeta {
	pub data_type: String,
	pub type_name: String,
	pub type_category: String,
}
impl TryFromRow for GetTypeMeta {
	fn from_row(row: &Row) -> Result<Self, Error> {
		Ok(GetTypeMeta {
			data_type: row.try_get(0)?,
			type_name: row.try_get(1)?,
			type_category: row.try_get(2)?,
		})
	}
}
