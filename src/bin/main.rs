use anyhow::Context;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use pg_struct_mapper::{connection::CatalogClient, generator::Generator, Opt};

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let opt = Opt::from_args();
	if !opt.types && !opt.tables && !opt.functions {
		anyhow::bail!("no structure types specified; pass some combination of -t, -r, and -f");
	}

	let mut client = CatalogClient::connect(&opt).context("database connection failed")?;
	Generator::new(&opt).run(&mut client)?;
	Ok(())
}
