#[cfg(not(target_env = "msvc"))]
#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = Jemalloc;

use clap::Parser;

use lia_sampler::sampler::Session;

mod args;
mod read;

use args::Args;

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let args = Args::parse();

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            println!("c Configuration error: {e:?}");
            std::process::exit(1);
        }
    };

    println!("c Reading SMT-LIB file from {:?}", args.file);

    let formula = match read::read_formula(&args.file) {
        Ok(formula) => formula,
        Err(e) => {
            println!("c Parse error: {e:?}");
            std::process::exit(1);
        }
    };

    let mut session = match Session::to_file(formula, config, &args.file, &args.output_dir) {
        Ok(session) => session,
        Err(e) => {
            println!("c Failed to open samples file: {e:?}");
            std::process::exit(1);
        }
    };

    match session.run() {
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            println!("c Sampling error: {e:?}");
            println!("Total samples number: {}", session.samples());
            std::process::exit(2);
        }
    }
}
