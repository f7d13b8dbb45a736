//! Integration tests for the generate, exports and init commands.
//!
//! Each test works on a copy of the fixtures in a temporary directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use zubora::cli::{
    run_exports, run_generate, run_init, ExportsArgs, GenerateArgs, InitArgs, EXIT_ERROR,
    EXIT_FAILED, EXIT_SUCCESS,
};
use zubora::Config;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Copy `testdata/project` into a fresh temp dir with an explicit config.
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let src = testdata_path().join("project");

    for entry in WalkDir::new(&src) {
        let entry = entry.expect("should walk fixtures");
        let target = dir.path().join(entry.path().strip_prefix(&src).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }

    let config = dir.path().join("zubora.yaml");
    std::fs::write(&config, "indent: 2\n").unwrap();
    let root = dir.path().join("src");
    (dir, root, config)
}

fn generate_args(path: &Path, config: &Path) -> GenerateArgs {
    GenerateArgs {
        path: path.to_path_buf(),
        config: Some(config.to_path_buf()),
        format: "text".to_string(),
        output: None,
        out_dir: None,
        style: None,
        module_path: None,
        dialect: None,
        force: false,
    }
}

#[test]
fn test_generate_directory() {
    let (_dir, root, config) = setup();
    let hand_written = std::fs::read_to_string(root.join("math.test.ts")).unwrap();

    let code = run_generate(&generate_args(&root, &config)).unwrap();
    // lib/broken.ts does not parse
    assert_eq!(code, EXIT_FAILED);

    let http = std::fs::read_to_string(root.join("lib/http.test.js"))
        .expect("Expected a scaffold next to lib/http.js");
    assert!(http.starts_with("import { Client } from './http';\n"));
    assert!(http.contains("const result = await instance.get(path);"));

    assert_eq!(
        std::fs::read_to_string(root.join("math.test.ts")).unwrap(),
        hand_written,
        "Expected existing tests to be left alone"
    );
    assert!(!root.join("lib/broken.test.ts").exists());
    assert!(!root.join("types.d.test.ts").exists());
    assert!(!root.join("__tests__/math.test.ts").exists());
}

#[test]
fn test_generate_directory_force_and_out_dir() {
    let (dir, root, config) = setup();
    let out = dir.path().join("tests");

    let mut args = generate_args(&root, &config);
    args.out_dir = Some(out.clone());
    args.force = true;
    run_generate(&args).unwrap();

    let math = std::fs::read_to_string(out.join("math.test.ts")).expect("Expected tests/math.test.ts");
    assert!(math.starts_with("import { add, PI } from '../src/math';\n"));

    let http = std::fs::read_to_string(out.join("lib/http.test.js")).expect("Expected mirrored layout");
    assert!(http.starts_with("import { Client } from '../../src/lib/http';\n"));
}

#[test]
fn test_generate_single_file_to_output() {
    let (dir, root, config) = setup();
    let output = dir.path().join("spec/math.spec.ts");

    let mut args = generate_args(&root.join("math.ts"), &config);
    args.output = Some(output.clone());
    args.style = Some("vitest".to_string());

    assert_eq!(run_generate(&args).unwrap(), EXIT_SUCCESS);
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("import { describe, expect, test } from 'vitest';\n"));
    assert!(text.contains("import { add, PI } from '../src/math';"));
}

#[test]
fn test_generate_rejects_bad_flags() {
    let (_dir, root, config) = setup();

    let mut args = generate_args(&root, &config);
    args.format = "xml".to_string();
    assert_eq!(run_generate(&args).unwrap(), EXIT_ERROR);

    let mut args = generate_args(&root, &config);
    args.style = Some("mocha".to_string());
    assert_eq!(run_generate(&args).unwrap(), EXIT_ERROR);

    let args = generate_args(&root.join("missing.ts"), &config);
    assert_eq!(run_generate(&args).unwrap(), EXIT_ERROR);
}

#[test]
fn test_exports_exit_codes() {
    let (_dir, root, config) = setup();
    let args = ExportsArgs {
        path: root.join("math.ts"),
        config: Some(config.clone()),
        format: "json".to_string(),
        dialect: None,
    };
    assert_eq!(run_exports(&args).unwrap(), EXIT_SUCCESS);

    let args = ExportsArgs {
        path: root.clone(),
        config: Some(config),
        format: "pretty".to_string(),
        dialect: None,
    };
    assert_eq!(run_exports(&args).unwrap(), EXIT_FAILED);
}

#[test]
fn test_init_writes_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("conf/zubora.yaml");
    let args = InitArgs {
        output: output.clone(),
        template: "vitest".to_string(),
        list: false,
    };
    assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);

    let config = Config::parse_file(&output).unwrap();
    assert_eq!(config.style, zubora::TestStyle::Vitest);

    // Refuses to overwrite
    assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

    let args = InitArgs {
        output: dir.path().join("other.yaml"),
        template: "nope".to_string(),
        list: false,
    };
    assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
}
