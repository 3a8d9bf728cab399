// src/main.rs

use dashgraph::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("dashgraph error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let layout = config::load_layout(&args.root, args.layout_path())?;
    logging::init_logging(args.log_level, layout.log_file())?;
    run(args, layout).await
}
