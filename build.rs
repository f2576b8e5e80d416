// build.rs - cache line detection
//
// Exports the host cache line size to the crate as
// CACHE_STRIDE_DEFAULT_LINE, which becomes the default alignment boundary.
//
// Override with: CACHE_STRIDE_LINE_SIZE=128 cargo build

use std::env;
use std::fs;
use std::path::PathBuf;

const FALLBACK_LINE_SIZE: usize = 64;

fn main() {
    println!("cargo:rerun-if-env-changed=CACHE_STRIDE_LINE_SIZE");

    let line_size = match env::var("CACHE_STRIDE_LINE_SIZE") {
        Ok(value) => match parse_line_size(&value) {
            Some(size) => size,
            None => {
                println!(
                    "cargo:warning=CACHE_STRIDE_LINE_SIZE={} is not a power of two, using {}",
                    value, FALLBACK_LINE_SIZE
                );
                FALLBACK_LINE_SIZE
            }
        },
        Err(_) => detect_line_size().unwrap_or(FALLBACK_LINE_SIZE),
    };

    println!("cargo:rustc-env=CACHE_STRIDE_DEFAULT_LINE={}", line_size);
}

fn parse_line_size(value: &str) -> Option<usize> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|size| *size >= 4 && size.is_power_of_two())
}

/// Read the L1 line size the kernel reports for the first CPU
fn detect_line_size() -> Option<usize> {
    // index0 is L1d on Linux; the others are a fallback for odd topologies
    let candidates = [
        "/sys/devices/system/cpu/cpu0/cache/index0/coherency_line_size",
        "/sys/devices/system/cpu/cpu0/cache/index1/coherency_line_size",
        "/sys/devices/system/cpu/cpu0/cache/index2/coherency_line_size",
    ];

    for path in &candidates {
        let path = PathBuf::from(path);
        if !path.exists() {
            continue;
        }
        println!("cargo:rerun-if-changed={}", path.display());
        if let Some(size) = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| parse_line_size(&raw))
        {
            return Some(size);
        }
    }

    None
}
