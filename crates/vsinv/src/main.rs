use clap::Parser;

use vsinv::cli::InventoryCli;
use vsinv::commands::inventory;
use vsinv::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = InventoryCli::parse();
    init_tracing(cli.connection.verbose);

    if let Err(err) = inventory::run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
