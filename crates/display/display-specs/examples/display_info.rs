//! Display Information Example
//!
//! Lists the bundled display specifications.
//!
//! Run with: cargo run -p display-specs --example display_info

use display_specs::displays::ALL;

fn main() {
    for spec in ALL {
        println!("\n{}", "=".repeat(48));
        println!("Display: {}", spec.name);
        println!("{}", "=".repeat(48));
        println!("  Resolution: {}×{} pixels", spec.width, spec.height);
        println!("  Aspect Ratio: {:.2}:1", spec.aspect_ratio());
        println!("  Controller: {:?}", spec.controller);
        println!("  Colour mode: {}", spec.color_mode);
        println!(
            "  Suggested transform: {}",
            spec.suggested_transform.unwrap_or("identity")
        );
    }
}
