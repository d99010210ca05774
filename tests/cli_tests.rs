use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    _dir: TempDir,
    source_path: PathBuf,
    target_path: PathBuf,
    config_path: PathBuf,
}

impl TestContext {
    fn new(source_rows: &[&str], target_text: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source_path = dir.path().join("source.tsv");
        let target_path = dir.path().join("target.txt");
        let config_path = dir.path().join("config.json");

        let mut source = File::create(&source_path).unwrap();
        for row in source_rows {
            writeln!(source, "{}", row).unwrap();
        }
        let mut target = File::create(&target_path).unwrap();
        writeln!(target, "{}", target_text).unwrap();

        Self {
            _dir: dir,
            source_path,
            target_path,
            config_path,
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cipherforge"))
            .args(args)
            .arg("--source-corpus")
            .arg(&self.source_path)
            .arg("--target-corpus")
            .arg(&self.target_path)
            .output()
            .expect("Failed to execute binary")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_cli_match() {
    let ctx = TestContext::new(&[], "");

    let ok = ctx.run(&["match", "cat", "dog"]);
    assert!(ok.status.success());
    assert!(stdout(&ok).contains("Consistent: c=d,a=o,t=g"));

    let clash = ctx.run(&["match", "cat", "gag"]);
    assert!(clash.status.success());
    assert!(stdout(&clash).contains("Inconsistent"));

    let mismatch = ctx.run(&["match", "abc", "ab"]);
    assert!(!mismatch.status.success());
}

#[test]
fn test_cli_match_checks_pins() {
    let ctx = TestContext::new(&[], "");

    let agrees = ctx.run(&["match", "cat", "dog", "--pin", "c=d,x=y"]);
    assert!(agrees.status.success());
    assert!(stdout(&agrees).contains("Consistent: c=d,a=o,t=g,x=y"));

    let clash = ctx.run(&["match", "cat", "dog", "--pin", "c=o"]);
    assert!(clash.status.success());
    assert!(stdout(&clash).contains("Conflicts with pins"));
}

#[test]
fn test_cli_reduce_lists_absorbed_samples() {
    let ctx = TestContext::new(&["ring\tNDSB", "rot\tSBND", "other\tLHMR"], "");
    let out = ctx.run(&["reduce"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("ring, rot"));
    assert!(text.contains("LHMR"));
}

#[test]
fn test_cli_frequencies_on_target() {
    let ctx = TestContext::new(&[], "Kanagawa no nami");
    let out = ctx.run(&["frequencies", "--side", "target", "--top", "3", "--shares"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("target 1-grams"));
    assert!(text.contains("target 3-grams"));
    assert!(text.contains("Bigram shares"));
}

#[test]
fn test_cli_solve_avoids_penalty() {
    let ctx = TestContext::new(&["s1\tAB"], "");
    let out = ctx.run(&[
        "solve",
        "--source-alphabet",
        "AB",
        "--target-alphabet",
        "xy",
        "--penalty",
        "xy",
    ]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Mapping: A=y,B=x"));
}

#[test]
fn test_cli_solve_reads_alphabets_from_config() {
    let ctx = TestContext::new(&["s1\tAB"], "");
    std::fs::write(
        &ctx.config_path,
        r#"{ "alphabets": { "source_alphabet": "AB", "target_alphabet": "xy" } }"#,
    )
    .unwrap();

    let out = ctx.run(&[
        "solve",
        "--config",
        ctx.config_path.to_str().unwrap(),
        "--penalty",
        "yx",
    ]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Mapping: A=x,B=y"));
}

#[test]
fn test_cli_solve_rejects_oversized_source() {
    let ctx = TestContext::new(&["s1\tABC"], "");
    let out = ctx.run(&[
        "solve",
        "--source-alphabet",
        "ABC",
        "--target-alphabet",
        "xy",
        "--penalty",
        "xy",
    ]);
    assert!(!out.status.success());
}

#[test]
fn test_cli_search_is_reproducible() {
    let ctx = TestContext::new(&["p1\tBCDCBCDCBCDC", "p2\tDCBCDCBD"], "kanakanakanaaknaknakkanana");
    let args = [
        "search",
        "--source-alphabet",
        "BCD",
        "--target-alphabet",
        "akn",
        "--max-staleness",
        "50",
        "--seed",
        "3",
        "--restarts",
        "2",
    ];

    let first = ctx.run(&args);
    let second = ctx.run(&args);
    assert!(first.status.success());
    assert!(stdout(&first).contains("Strategy: local_search"));
    assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn test_cli_search_accepts_the_largest_seed() {
    let ctx = TestContext::new(&["p1\tBCDCBCDC"], "kanakanakana");
    let out = ctx.run(&[
        "search",
        "--source-alphabet",
        "BCD",
        "--target-alphabet",
        "akn",
        "--max-staleness",
        "20",
        "--seed",
        "18446744073709551615",
        "--restarts",
        "2",
    ]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Strategy: local_search"));
}

#[test]
fn test_cli_partition() {
    let ctx = TestContext::new(&["p\tABCDABCDCBAD"], "kanikanikani");
    let out = ctx.run(&[
        "partition",
        "--source-alphabet",
        "ABCD",
        "--target-alphabet",
        "aikn",
        "--pseudo-count",
        "0",
        "--classes",
        "v=ai,c=kn",
    ]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Best of 6 partitions"));
    assert!(text.contains("BD"));
}

#[test]
fn test_cli_classify() {
    let ctx = TestContext::new(&["g1\taaaaaaaab", "g2\taaaaaaaaa", "noise\tbbbbbbb"], "");
    let out = ctx.run(&["classify", "--source-alphabet", "ab"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("noise"));
    assert!(text.contains("rejected"));
}

#[test]
fn test_cli_missing_corpus_fails() {
    let ctx = TestContext::new(&[], "");
    let out = Command::new(env!("CARGO_BIN_EXE_cipherforge"))
        .args(["reduce", "--source-corpus"])
        .arg(ctx.source_path.with_extension("missing"))
        .output()
        .unwrap();
    assert!(!out.status.success());
}
