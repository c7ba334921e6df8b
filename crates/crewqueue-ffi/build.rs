use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_path = PathBuf::from(&crate_dir).join("crewqueue.h");

    cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CREWQUEUE_H")
        .with_cpp_compat(true)
        .with_documentation(true)
        .generate()
        .expect("Unable to generate bindings")
        .write_to_file(out_path);
}
