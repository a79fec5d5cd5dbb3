//! Generate Markdown reference docs from `dash_core::lang` registries.
//!
//! Writes `docs/language/reference.md` at the workspace root.
//!
//! ## Notes
//! - The generated file is a derived artifact; update the registries instead of editing it.
//!
//! ## Examples
//! Run from the workspace root:
//! ```bash
//! cargo run -p dash_core --bin generate_lang_reference
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use dash_core::lang::reference;

fn main() -> io::Result<()> {
    let out_dir = workspace_root()?.join("docs/language");
    fs::create_dir_all(&out_dir)?;

    let mut doc = reference::render_markdown();
    doc.push('\n');
    let path = out_dir.join("reference.md");
    fs::write(&path, doc)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn workspace_root() -> io::Result<PathBuf> {
    // crates/dash_core -> crates -> workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "workspace root above crates/dash_core"))
}
