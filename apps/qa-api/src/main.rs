use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = qa_api::Args::parse();

	qa_api::run(args).await
}
