use std::path::PathBuf;
use std::sync::OnceLock;

/// Workspace root, taken as the parent of the calling crate's manifest directory.
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

fn test_output_dir() -> &'static PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = workspace_root().join("test_output");
        std::fs::create_dir_all(&dir).expect("Failed to create test_output directory");
        dir
    })
}

/// Path for a test artifact under `<workspace>/test_output/`.
pub fn test_output_path(name: &str) -> PathBuf {
    test_output_dir().join(name)
}
