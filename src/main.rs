//! local-rt-setup - provision a local Artifactory for integration tests

use clap::Parser;

use local_rt_setup::cli::Cli;
use local_rt_setup::environment::ProcessEnvironmentSink;
use local_rt_setup::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut env = ProcessEnvironmentSink;
    if let Err(e) = local_rt_setup::run(&cli, &mut env) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
