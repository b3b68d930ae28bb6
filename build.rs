//! Build script reporting missing system libraries for optional features.
//!
//! The `camera` feature needs OpenCV and the `audio` feature needs ALSA on
//! Linux. Both are located through pkg-config; a missing library only
//! produces installation hints, the actual link error comes later.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    if env::var_os("CARGO_FEATURE_CAMERA").is_some() {
        check_opencv();
    }

    if env::var_os("CARGO_FEATURE_AUDIO").is_some() && env::var("TARGET").unwrap_or_default().contains("linux") {
        check_alsa();
    }
}

fn pkg_config_version(name: &str) -> Option<String> {
    let output = Command::new("pkg-config").args(["--modversion", name]).output().ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    match pkg_config_version("opencv4").or_else(|| pkg_config_version("opencv")) {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. The camera feature needs it.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev clang libclang-dev");
            println!("cargo:warning=On macOS: brew install opencv");
        }
    }
}

fn check_alsa() {
    if pkg_config_version("alsa").is_none() {
        println!("cargo:warning=ALSA libraries not found. The audio feature needs them.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install libasound2-dev");
    }
}
