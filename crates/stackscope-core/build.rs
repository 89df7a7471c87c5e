//! Build script for stackscope-core
//!
//! Checks the toolchain before compilation.
//!
//! ## Requirements
//!
//! - **Rust**: 1.73.0 or newer (`let ... else`, `div_ceil`)

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    let Ok(rustc_version) = rustc_version::version() else {
        // Some build environments hide the compiler version
        println!("cargo:warning=could not verify Rust version");
        return;
    };

    let min_rust_version = rustc_version::Version::new(1, 73, 0);
    if rustc_version < min_rust_version {
        panic!("stackscope-core requires Rust {min_rust_version} or newer, found {rustc_version}");
    }
}
