//! Error taxonomy for a generator run

use thiserror::Error;

/// Everything that can go wrong while mapping a database.
///
/// `UnknownType`, `UnresolvedArgumentType`, and `MalformedArguments` abort only
/// the object being generated. An `Sql` error from a listing query aborts that
/// object category, and anything raised before the first listing query (connect,
/// version probe, domain bootstrap) is fatal to the whole run.
#[derive(Debug, Error)]
pub enum GenError {
	#[error("unable to translate type name {0:?}")]
	UnknownType(String),
	#[error("unable to resolve argument type {0:?}")]
	UnresolvedArgumentType(String),
	#[error("malformed argument list: {0}")]
	MalformedArguments(String),
	#[error("generation failed for: {0}")]
	Category(String),
	#[error(transparent)]
	Sql(#[from] postgres::Error),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
