fn main() {
    if let Err(err) = resto_explore::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
