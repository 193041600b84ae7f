use std::path::{Path, PathBuf};
use std::env;

/// The SDK ships the header as `Include/` on Windows and `include/` elsewhere
fn locate_header(ndi_sdk_dir: &Path) -> PathBuf {
    ["Include", "include"]
        .iter()
        .map(|dir| ndi_sdk_dir.join(dir).join("Processing.NDI.Lib.h"))
        .find(|header| header.exists())
        .expect("Failed to locate Processing.NDI.Lib.h inside the NDI SDK")
}

fn main() {
    println!("cargo:rerun-if-env-changed=NDI_SDK_DIR");

    let ndi_sdk_dir = PathBuf::from(env::var("NDI_SDK_DIR").expect("Failed to locate the NDI SDK"));

    let header = locate_header(&ndi_sdk_dir);

    // The runtime library is opened at run time (see `sdk::NDIRuntime::load`),
    // nothing is linked here.
    let bindings = bindgen::Builder::default()
        .header(header.to_str().expect("NDI SDK path is not valid UTF-8"))
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .allowlist_function("NDIlib_.*")
        .allowlist_type("NDIlib_.*")
        .allowlist_var("NDIlib_.*")
        .dynamic_library_name("NDIlib")
        .derive_debug(true)
        .generate()
        .expect("Unable to generate bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");
}
