fn main() {
    if let Err(err) = dstok::run() {
        eprintln!("{}", dstok::format_error(&err));
        std::process::exit(1);
    }
}
