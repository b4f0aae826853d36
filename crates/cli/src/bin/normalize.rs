//! `bench-normalize` entry point.

fn main() {
    if let Err(e) = benchdiff_cli::run_normalize() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
