use std::process;

fn main() {
    expenses::init();

    if let Err(err) = expenses::cli::run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
