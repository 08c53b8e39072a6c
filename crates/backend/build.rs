use std::env;
use std::fs;
use std::path::Path;

/// Data files the dashboard reads at startup, relative to the workspace root
const DATA_FILES: &[&str] = &["data/superstore.csv", "data/states.json"];

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    for file in DATA_FILES {
        println!("cargo:rerun-if-changed=../../{}", file);
    }

    // OUT_DIR is typically: target/debug/build/backend-xxx/out
    // We need to go to: target/debug or target/release
    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .expect("Could not find target profile directory");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    // config.toml next to the executable; its relative data paths then
    // resolve against the same directory, so the data files go there too
    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        let dest_config = target_dir.join("config.toml");
        fs::copy(&source_config, &dest_config)
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    } else {
        println!("cargo:warning=config.toml not found at {:?}, using default config", source_config);
    }

    for file in DATA_FILES {
        let source = workspace_root.join(file);
        if !source.exists() {
            println!("cargo:warning={} not found, the dashboard will fail to start", file);
            continue;
        }
        let dest = target_dir.join(file);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create {:?}: {}", parent, e));
        }
        fs::copy(&source, &dest).unwrap_or_else(|e| panic!("Failed to copy {}: {}", file, e));
    }
}
