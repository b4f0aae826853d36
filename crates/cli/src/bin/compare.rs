//! `bench-compare` entry point.

fn main() {
    if let Err(e) = benchdiff_cli::run_compare() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
