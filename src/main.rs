fn main() {
    if let Err(err) = algoviz_plan::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
