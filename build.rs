fn main() {
    // UniFFI scaffolding comes from proc-macros in uniffi_bindings.rs
    println!("cargo:rerun-if-changed=src/uniffi_bindings.rs");
    println!("cargo:rerun-if-changed=assets");
    println!("cargo:rerun-if-changed=build.rs");
}
