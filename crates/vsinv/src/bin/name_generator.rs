use clap::Parser;

use vsinv::cli::NameGeneratorCli;
use vsinv::commands::names;
use vsinv::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = NameGeneratorCli::parse();
    init_tracing(cli.connection.verbose);

    if let Err(err) = names::run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
