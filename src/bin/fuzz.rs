#[macro_use]
extern crate afl;

use calculator::{evaluate_with, Config};

fn main() {
    let config = Config {
        quiet: true,
        ..Config::default()
    };

    fuzz!(|data: &[u8]| {
        if let Ok(line) = std::str::from_utf8(data) {
            let _ = evaluate_with(line, &config);
        }
    });
}
