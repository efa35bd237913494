// build.rs for simd_qsort
use std::env;

// Native packs need compress stores (avx512f) and fpclass (avx512dq).
const NATIVE_FEATURES: [&str; 2] = ["avx512f", "avx512dq"];

fn main() {
    println!("cargo:rustc-check-cfg=cfg(has_avx512)");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TARGET_FEATURE");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    let enabled: Vec<&str> = features.split(',').collect();

    if arch == "x86_64" && NATIVE_FEATURES.iter().all(|f| enabled.contains(f)) {
        println!("cargo:rustc-cfg=has_avx512");
    }
}
