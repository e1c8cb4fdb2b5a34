//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 scene-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `scene-check`: 检查演出脚本文件（语法、时长、信号引用）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use scene_runtime::{Effect, ScriptStep, parse_steps};

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "scene-runtime", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p scene-runtime --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // workspace 覆盖率仅用于趋势观察，口径上排除 tool crate
            let mut cov = Command::new("cargo");
            cov.args([
                "llvm-cov",
                "--workspace",
                "--exclude",
                "xtask",
                "--all-features",
                "--html",
            ]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "scene-check" => {
            let path = args.next();
            scene_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 scene-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  scene-check     检查演出脚本文件

SCENE-CHECK:
  cargo xtask scene-check [path]

  不带参数：检查 assets/scenes/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 语法与效果结构
    - 非法时长（负数 / NaN）
    - 空白的信号或目标名
    - 需要文本能力的目标清单
"#
    );
}

//=============================================================================
// scene-check 命令实现
//=============================================================================

/// 默认脚本目录（相对于 workspace root）
const DEFAULT_SCENES_DIR: &str = "assets/scenes";

/// 脚本检查结果
struct SceneCheckResult {
    scripts_checked: usize,
    errors: usize,
    warnings: usize,
}

/// 执行演出脚本检查
fn scene_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_scene_files(&path)?
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = PathBuf::from(DEFAULT_SCENES_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认脚本目录不存在: {}\n请在 workspace 根目录运行，或指定脚本路径",
                    dir.display()
                );
            }
            collect_scene_files(&dir)?
        }
    };

    if files.is_empty() {
        eprintln!("未找到演出脚本文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个演出脚本...\n", files.len());

    let mut result = SceneCheckResult {
        scripts_checked: 0,
        errors: 0,
        warnings: 0,
    };

    for file in &files {
        check_scene_file(file, &mut result);
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个脚本", result.scripts_checked);
    if result.errors > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", result.errors, result.warnings);
        anyhow::bail!("演出脚本检查发现错误");
    } else if result.warnings > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warnings);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }

    Ok(())
}

/// 收集目录下的所有演出脚本文件
fn collect_scene_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_scene_files_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_scene_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_scene_files_recursive(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

/// 检查单个演出脚本文件
fn check_scene_file(file: &Path, result: &mut SceneCheckResult) {
    let script_id = file.display().to_string();
    result.scripts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", script_id, e);
            result.errors += 1;
            return;
        }
    };

    let steps = match parse_steps(&content) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", script_id, e);
            result.errors += 1;
            return;
        }
    };

    if steps.is_empty() {
        eprintln!("[ERROR] {}: 脚本为空", script_id);
        result.errors += 1;
        return;
    }

    let mut text_targets: Vec<&str> = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        check_step(&script_id, index, step, result);
        if step.effect.requires_text() && !text_targets.contains(&step.target.as_str()) {
            text_targets.push(&step.target);
        }
    }

    if !text_targets.is_empty() {
        eprintln!(
            "[INFO] {}: 以下目标需要文本能力: {}",
            script_id,
            text_targets.join(", ")
        );
    }
}

/// 检查单行脚本
fn check_step(script_id: &str, index: usize, step: &ScriptStep, result: &mut SceneCheckResult) {
    if step.target.trim().is_empty() {
        eprintln!("[ERROR] {}: 第 {} 行目标名为空", script_id, index + 1);
        result.errors += 1;
    }
    check_effect(script_id, index, &step.effect, result);
}

fn check_effect(script_id: &str, index: usize, effect: &Effect, result: &mut SceneCheckResult) {
    match effect {
        Effect::Move { duration, .. }
        | Effect::Pause { duration }
        | Effect::FadeIn { duration, .. }
        | Effect::FadeOut { duration, .. } => {
            if duration.is_nan() || *duration < 0.0 {
                eprintln!(
                    "[WARN] {}: 第 {} 行时长非法 ({})，运行时会立即定格",
                    script_id,
                    index + 1,
                    duration
                );
                result.warnings += 1;
            }
        }
        Effect::WaitForSignal { id } => {
            if id.trim().is_empty() {
                eprintln!("[WARN] {}: 第 {} 行信号名为空", script_id, index + 1);
                result.warnings += 1;
            }
        }
        Effect::Then(first, second) => {
            check_effect(script_id, index, first, result);
            check_effect(script_id, index, second, result);
        }
        Effect::SetText { .. } | Effect::Show | Effect::Hide => {}
    }
}
