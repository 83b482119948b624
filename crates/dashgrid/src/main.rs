#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = dashgrid::run_from_env() {
        eprintln!("dashgrid: {error}");
        std::process::exit(error.exit_code());
    }
}
