// Stages the host page from static/ into dist/.
//
// index.html loads ./pkg/site_visuals.js, so build the bindings into static/:
//
//     wasm-pack build --target web --out-dir static/pkg
//
// wasm-pack writes static/pkg after cargo has run this script, so dist/ picks
// up fresh bindings on the following build. Serve static/ directly meanwhile.
use std::path::Path;

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        if let Err(err) = std::fs::remove_dir_all(out_dir) {
            println!("cargo:warning=could not clear dist/: {err}");
        }
    }
    if let Err(err) = std::fs::create_dir_all(out_dir) {
        println!("cargo:warning=could not create dist/: {err}");
        return;
    }

    let options = CopyOptions {
        overwrite: true,
        content_only: true,
        ..CopyOptions::new()
    };
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=failed to stage static/: {err}");
    }
}
