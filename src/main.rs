use audiomnist_fetch::run;

fn main() {
    if let Err(error) = run() {
        eprintln!();
        eprintln!("Error downloading dataset: {error}");
        eprintln!();
        eprintln!("{}", error.remediation());
        std::process::exit(1);
    }
}
