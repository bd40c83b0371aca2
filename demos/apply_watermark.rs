//! Apply a watermark to a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example apply_watermark -- input.jpg logo.png output.png [opacity]
//! ```

use std::env;
use std::process;

use batch_watermark::{add_watermark, Opacity};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <watermark> <output> [opacity]", args[0]);
        process::exit(1);
    }

    let opacity = match args.get(4).map(|s| s.parse::<Opacity>()) {
        None => Opacity::default(),
        Some(Ok(o)) => o,
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    match add_watermark(args[1].as_ref(), args[2].as_ref(), args[3].as_ref(), opacity) {
        Ok(()) => println!("Done: {}", args[3]),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
