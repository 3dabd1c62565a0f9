//! Build script for the Pokedex API.

use rustc_version::version_meta;
use rustc_version::Channel::Nightly;

#[doc(hidden)]
fn main() {
    // Migrations are embedded in `run_migrations`, so it must be rebuilt when they change.
    println!("cargo:rerun-if-changed=migrations");

    // `std::error::request_ref` is only available on Nightly (or dev) toolchains; errors only
    // carry a `Backtrace` when we can actually fetch it back.
    let channel = version_meta().map(|meta| meta.channel);
    if matches!(channel, Ok(channel) if channel <= Nightly) {
        println!("cargo:rustc-cfg=backtrace_support");
    }
}
