use clap::Parser;
use duo_chess::config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::parse();
    log::info!("Chess - terminal ({:?} sync)", config.sync);
    duo_chess::mock::run_interactive_terminal(&config);
}
