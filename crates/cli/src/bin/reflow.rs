//! `bench-reflow` entry point.

fn main() {
    if let Err(e) = benchdiff_cli::run_reflow() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
