//! CLI integration tests
//!
//! Runs the `ctxgen` binary against temporary copies of the demo project.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn ctxgen_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ctxgen").unwrap();
    cmd.env_remove("CTXGEN_JSON")
        .env_remove("CTXGEN_INPUT")
        .env_remove("CTXGEN_ABI_VERSION");
    cmd
}

fn demo_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/hpy")
}

/// Temporary project holding a copy of the demo
fn demo_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("tools")).unwrap();
    fs::copy(demo_dir().join("ctxgen.toml"), dir.path().join("ctxgen.toml")).unwrap();
    fs::copy(
        demo_dir().join("tools/public_api.h"),
        dir.path().join("tools/public_api.h"),
    )
    .unwrap();
    dir
}

/// Temporary project with the given header and no configuration file
fn header_project(header: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("tools")).unwrap();
    fs::write(dir.path().join("tools/public_api.h"), header).unwrap();
    dir
}

const GENERATED: [&str; 4] = [
    "hpy-api/hpy_devel/include/universal/autogen_ctx.h",
    "cpython-universal/src/autogen_ctx_def.h",
    "hpy-api/hpy_devel/include/universal/autogen_func.h",
    "tools/autogen_pypy.txt",
];

mod help_messages {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        ctxgen_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("generate"))
            .stdout(predicate::str::contains("check"))
            .stdout(predicate::str::contains("list"))
            .stdout(predicate::str::contains("CTXGEN_JSON"));
    }
}

mod generate_command {
    use super::*;

    #[test]
    fn test_generate_writes_all_artifacts() {
        let project = demo_project();
        ctxgen_cmd()
            .arg("generate")
            .current_dir(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("autogen_ctx.h"))
            .stdout(predicate::str::contains("autogen_pypy.txt"));

        for path in GENERATED {
            assert!(project.path().join(path).is_file(), "missing {}", path);
        }

        let trampolines =
            fs::read_to_string(project.path().join(GENERATED[2])).unwrap();
        assert!(trampolines.contains("va_start(_vl, fmt);"));
        assert!(!trampolines.contains("_HPy_CallRealFunctionFromTrampoline"));

        let definition = fs::read_to_string(project.path().join(GENERATED[1])).unwrap();
        assert!(definition.contains(".ctx_CallRealFunctionFromTrampoline = NULL,"));
    }

    #[test]
    fn test_generate_from_subdirectory_walks_up() {
        let project = demo_project();
        ctxgen_cmd()
            .arg("generate")
            .current_dir(project.path().join("tools"))
            .assert()
            .success();
        assert!(project.path().join(GENERATED[0]).is_file());
    }

    #[test]
    fn test_generate_with_explicit_config() {
        let project = demo_project();
        ctxgen_cmd()
            .arg("generate")
            .arg("--config")
            .arg(project.path().join("ctxgen.toml"))
            .assert()
            .success();
        assert!(project.path().join(GENERATED[3]).is_file());
    }

    #[test]
    fn test_generate_is_idempotent() {
        let project = demo_project();
        let read_all = |root: &Path| -> Vec<String> {
            GENERATED
                .iter()
                .map(|p| fs::read_to_string(root.join(p)).unwrap())
                .collect()
        };

        ctxgen_cmd().arg("generate").arg("--root").arg(project.path()).assert().success();
        let first = read_all(project.path());
        ctxgen_cmd().arg("generate").arg("--root").arg(project.path()).assert().success();
        assert_eq!(first, read_all(project.path()));
    }

    #[test]
    fn test_warnings_go_to_stderr() {
        let project = header_project("HPy h_None;\nint helper(int x);\n");
        ctxgen_cmd()
            .arg("generate")
            .arg("--root")
            .arg(project.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("CG2001"))
            .stderr(predicate::str::contains("helper"));

        let decl = fs::read_to_string(project.path().join(GENERATED[0])).unwrap();
        assert!(!decl.contains("helper"));
    }

    #[test]
    fn test_collision_writes_nothing() {
        let project = header_project(
            "HPy HPy_Dup(HPyContext ctx, HPy h);\nHPy _HPy_Dup(HPyContext ctx, HPy h);\n",
        );
        ctxgen_cmd()
            .arg("generate")
            .arg("--root")
            .arg(project.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("CG3003"))
            .stderr(predicate::str::contains("HPy_Dup and _HPy_Dup"));

        for path in GENERATED {
            assert!(!project.path().join(path).exists(), "{} was written", path);
        }
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let project = header_project("HPy h_None\nHPy h_True;\n");
        ctxgen_cmd()
            .arg("generate")
            .arg("--root")
            .arg(project.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("CG1000"))
            .stderr(predicate::str::contains("tools/public_api.h"));
    }

    #[test]
    fn test_json_diagnostics() {
        let project = header_project("HPy h_None;\nint counter;\n");
        let output = ctxgen_cmd()
            .arg("generate")
            .arg("--root")
            .arg(project.path())
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let stderr = String::from_utf8(output.stderr).unwrap();
        let first = stderr.lines().next().unwrap();
        let diag: serde_json::Value = serde_json::from_str(first).unwrap();
        assert_eq!(diag["code"], "CG2002");
        assert_eq!(diag["level"], "warning");

        let stdout = String::from_utf8(output.stdout).unwrap();
        let written: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
        assert_eq!(written["written"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_input_fails() {
        let project = TempDir::new().unwrap();
        ctxgen_cmd()
            .arg("generate")
            .arg("--root")
            .arg(project.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read interface header"));
    }

    #[test]
    fn test_input_env_override() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("api.h"), "HPy h_None;\n").unwrap();
        ctxgen_cmd()
            .arg("generate")
            .arg("--root")
            .arg(project.path())
            .env("CTXGEN_INPUT", "api.h")
            .assert()
            .success();

        let decl = fs::read_to_string(project.path().join(GENERATED[0])).unwrap();
        assert!(decl.contains("generated by ctxgen from api.h."));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn test_check_before_and_after_generate() {
        let project = demo_project();
        ctxgen_cmd()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .assert()
            .failure()
            .stdout(predicate::str::contains("missing"));

        ctxgen_cmd().arg("generate").arg("--root").arg(project.path()).assert().success();

        ctxgen_cmd()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("up to date"));
    }

    #[test]
    fn test_check_detects_header_change() {
        let project = demo_project();
        ctxgen_cmd().arg("generate").arg("--root").arg(project.path()).assert().success();

        let header = project.path().join("tools/public_api.h");
        let mut text = fs::read_to_string(&header).unwrap();
        text.push_str("HPy HPy_Repr(HPyContext ctx, HPy obj);\n");
        fs::write(&header, text).unwrap();

        let output = ctxgen_cmd()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg("--json")
            .output()
            .unwrap();
        assert!(!output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["up_to_date"], false);
        let drift = report["drift"].as_array().unwrap();
        assert_eq!(drift.len(), 4);
        assert!(drift.iter().all(|d| d["state"] == "stale"));
    }
}

mod list_command {
    use super::*;

    #[test]
    fn test_list_text() {
        let project = demo_project();
        ctxgen_cmd()
            .arg("list")
            .arg("--root")
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("constant  h_None -> h_None"))
            .stdout(predicate::str::contains("variadic  HPyErr_Format -> ctx_Err_Format"))
            .stdout(predicate::str::contains("(internal)"));
    }

    #[test]
    fn test_list_json_preserves_order() {
        let project = demo_project();
        let output = ctxgen_cmd()
            .arg("list")
            .arg("--root")
            .arg(project.path())
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(listing["version_field"], "ctx_version");
        let slots = listing["slots"].as_array().unwrap();
        assert_eq!(slots[0]["slot"], "h_None");
        assert_eq!(slots[4]["slot"], "ctx_Module_Create");
        assert_eq!(slots.last().unwrap()["internal"], true);
    }

    #[test]
    fn test_list_writes_nothing() {
        let project = demo_project();
        ctxgen_cmd().arg("list").arg("--root").arg(project.path()).assert().success();
        assert!(!project.path().join(GENERATED[0]).exists());
    }
}
