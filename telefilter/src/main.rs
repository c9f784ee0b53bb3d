use telefilter::core::App;

fn main() {
    if let Err(e) = App::run() {
        eprintln!("\nError: {:#}\n", e);
        std::process::exit(1);
    }
}
