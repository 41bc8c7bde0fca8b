use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

/// Per-test scratch directory, removed when dropped.
struct Scratch(PathBuf);

impl Scratch {
    fn new(test: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "ocean-descent-cli-{}-{test}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create scratch directory");
        Self(dir)
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create scratch subdirectory");
        }
        fs::write(&path, contents).expect("failed to write scratch file");
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn run_dive(config: &Path, script: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ocean-descent"))
        .args(["--config"])
        .arg(config)
        .args(["--log-level", "warn"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to launch ocean-descent");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script)
        .expect("failed to write script");
    child.wait_with_output().expect("ocean-descent should exit")
}

#[test]
fn scripted_dive_prints_a_frame_per_input() {
    let scratch = Scratch::new("json");
    let _ = scratch.file(
        "dive.json",
        r#"{"resources": [{"col": 30, "row": 30, "layer": 2}]}"#,
    );
    let config = scratch.file(
        "session.toml",
        "[data]\ndataset = \"dive.json\"\npolicy = \"field\"\n",
    );

    let output = run_dive(&config, b"click 100 100\nclick 120 121\ndown\nclick 121 122\n");

    assert!(output.status.success(), "scripted dive should succeed");
    let stdout = String::from_utf8(output.stdout).expect("output is utf-8");
    assert_eq!(stdout.matches("== Layer").count(), 5);
    assert!(stdout.contains("== Layer 2/6  radius=64"));
    assert!(stdout.contains("Depth: 200 m"));
}

#[test]
fn csv_directory_datasets_are_loaded() {
    let scratch = Scratch::new("csv");
    let _ = scratch.file("tables/resources.csv", "row,col,layer\n30.0,30.0,2\n");
    let _ = scratch.file("tables/currents.csv", "row,col,u_mps,v_mps\n30,30,0.1,0.1\n");
    let config = scratch.file(
        "session.toml",
        "[data]\ndataset = \"tables\"\npolicy = \"field\"\n",
    );

    let output = run_dive(&config, b"click 100 100\ndown\n");

    assert!(output.status.success(), "csv dive should succeed");
    let stdout = String::from_utf8(output.stdout).expect("output is utf-8");
    assert!(stdout.contains("== Layer 2/6  radius=64"));
    let preview_rows: Vec<&str> = stdout
        .lines()
        .filter(|line| !line.is_empty() && line.chars().all(|glyph| ".@CFHLPR".contains(glyph)))
        .collect();
    assert!(
        preview_rows.iter().any(|row| row.contains('R')),
        "resource from resources.csv should be drawn on layer 2, stdout was: {stdout}"
    );
}

#[test]
fn malformed_script_fails_with_line_number() {
    let scratch = Scratch::new("broken");
    let output = Command::new(env!("CARGO_BIN_EXE_ocean-descent"))
        .args(["--log-level", "off"])
        .arg("--script")
        .arg(scratch.file("broken.script", "click 1 1\nswim\n"))
        .output()
        .expect("failed to launch ocean-descent");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("script line 2"), "stderr was: {stderr}");
}
