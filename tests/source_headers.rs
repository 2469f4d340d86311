// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Every copyright line in the crate names the same author address.

use std::fs;
use std::path::{Path, PathBuf};

const COPYRIGHT: &str = "// Copyright 2026 Roland Dreier <roland@rolandd.dev>";

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

#[test]
fn test_copyright_lines_agree() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    for dir in ["src", "tests", "benches"] {
        let dir = root.join(dir);
        if dir.is_dir() {
            rust_files(&dir, &mut files);
        }
    }
    assert!(!files.is_empty());

    for file in files {
        let text = fs::read_to_string(&file).unwrap();
        for line in text.lines().take(5) {
            if line.starts_with("// Copyright") {
                assert_eq!(line, COPYRIGHT, "{}", file.display());
            }
        }
    }
}
