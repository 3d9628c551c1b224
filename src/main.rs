use clap::Parser;
use tokio::runtime::Runtime;

fn main() {
    env_logger::init();
    let opts = desk_agent::Opts::parse();

    let code = match Runtime::new() {
        Ok(rt) => match rt.block_on(desk_agent::run(opts)) {
            Ok(code) => code,
            Err(x) => {
                eprintln!("{}", x);
                1
            }
        },
        Err(x) => {
            eprintln!("Failed to start runtime: {}", x);
            1
        }
    };

    std::process::exit(code);
}
