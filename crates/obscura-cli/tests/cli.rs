use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"[
  {"name":"NotesPro","bundle":"com.example.notespro","dev":"Acme","versions":[
    {"ver":"2.0","support":"9.0","urls":[
      {"url":"https://cdn.example.com/pro-2.ipa","bv":"20","fs":2048,"bin":{"arm64":false}}]}]},
  {"name":"Notes","bundle":"com.example.notes","dev":"Acme","versions":[
    {"ver":"1.0","support":"6.0","urls":[
      {"url":"http://old.example.com/notes-1.ipa","bv":"10","fs":1024,"bin":{"arm32":false}}]},
    {"ver":"1.5","support":"7.0","urls":[]}]}
]"#;

/// Test context that sets up a temporary obscura home
struct TestContext {
    temp_dir: TempDir,
    home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let home = temp_dir.path().join(".obscura");
        std::fs::create_dir_all(&home).expect("failed to create obscura home");
        Self { temp_dir, home }
    }

    fn with_snapshot() -> Self {
        let ctx = Self::new();
        std::fs::write(ctx.snapshot(), SNAPSHOT).expect("failed to write snapshot");
        ctx
    }

    fn snapshot(&self) -> PathBuf {
        self.home.join("apps.json")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_obscura"))
            .args(args)
            .env("HOME", self.temp_dir.path())
            .env("OBSCURA_HOME", &self.home)
            .env_remove("OBSCURA_SNAPSHOT")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run obscura")
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "obscura {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

fn add_args<'a>(bundle: &'a str, version: &'a str, url: &'a str) -> Vec<&'a str> {
    vec![
        "add", "--bundle", bundle, "--version", version, "--min-os", "6.0", "--url", url,
    ]
}

fn read_snapshot(ctx: &TestContext) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(ctx.snapshot()).unwrap()).unwrap()
}

fn line_of(stdout: &str, pred: impl Fn(&str) -> bool) -> Option<usize> {
    stdout.lines().position(pred)
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let stdout = ctx.stdout(&["--help"]);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_missing_snapshot_is_an_error() {
    let ctx = TestContext::new();
    let output = ctx.run(&["list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No snapshot found"), "stderr: {stderr}");
}

#[test]
fn test_search_lists_shorter_names_first() {
    let ctx = TestContext::with_snapshot();
    let stdout = ctx.stdout(&["search", "note"]);

    let notes = line_of(&stdout, |l| l.contains("com.example.notes") && !l.contains("notespro"));
    let pro = line_of(&stdout, |l| l.contains("com.example.notespro"));
    assert!(notes.is_some() && pro.is_some(), "stdout: {stdout}");
    assert!(notes < pro);
}

#[test]
fn test_search_respects_os() {
    let ctx = TestContext::with_snapshot();
    let stdout = ctx.stdout(&["search", "note", "--os", "8.0"]);
    assert!(stdout.contains("com.example.notes"));
    assert!(!stdout.contains("com.example.notespro"));

    let stdout = ctx.stdout(&["search", "calendar"]);
    assert!(stdout.contains("No packages found"));
}

#[test]
fn test_info_shows_versions_for_os() {
    let ctx = TestContext::with_snapshot();
    let stdout = ctx.stdout(&["info", "com.example.notes"]);
    assert!(stdout.contains("Acme"));
    assert!(stdout.contains("1.5"));
    assert!(stdout.contains("1.0"));

    let stdout = ctx.stdout(&["info", "com.example.notes", "--os", "6.1"]);
    assert!(stdout.lines().any(|l| l.trim_start().starts_with("latest")));
    assert!(!stdout.lines().any(|l| l.trim_start().starts_with("1.5")));
    assert!(stdout.lines().any(|l| l.trim_start().starts_with("1.0")));

    let output = ctx.run(&["info", "com.example.missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_links_show_hosts_and_install_methods() {
    let ctx = TestContext::with_snapshot();

    let stdout = ctx.stdout(&["links", "com.example.notes", "1.0", "--os", "15.0"]);
    assert!(stdout.contains("old.example.com"));
    assert!(stdout.contains("10.99.99"));
    assert!(stdout.contains("installable"));
    assert!(stdout.lines().any(|l| l.contains("old.example.com") && l.contains("yes")));
    assert!(stdout.contains("TrollStore"));
    assert!(stdout.contains("SideStore"));

    let stdout = ctx.stdout(&["links", "com.example.notespro", "2.0"]);
    assert!(stdout.contains("cdn.example.com, SSL"));
    assert!(!stdout.contains("TrollStore"));

    let output = ctx.run(&["links", "com.example.notes", "9.9"]);
    assert!(!output.status.success());
}

#[test]
fn test_check_url() {
    let ctx = TestContext::with_snapshot();
    let stdout = ctx.stdout(&["check-url", "https://cdn.example.com/pro-2.ipa"]);
    assert!(stdout.contains("known"));

    let stdout = ctx.stdout(&["check-url", "https://cdn.example.com/other.ipa"]);
    assert!(stdout.contains("not in catalog"));
}

#[test]
fn test_stats_counts() {
    let ctx = TestContext::with_snapshot();
    let stdout = ctx.stdout(&["stats", "--os", "8.0"]);
    let rows: Vec<Vec<&str>> = stdout
        .lines()
        .map(|l| l.split_whitespace().collect())
        .filter(|row: &Vec<&str>| row.len() == 2)
        .collect();

    assert_eq!(rows[0], ["packages", "2"]);
    assert_eq!(rows[1], ["versions", "3"]);
    assert_eq!(rows[2], ["urls", "2"]);
    assert_eq!(rows[3], ["on", "8.0"]);
    assert_eq!(rows[4], ["packages", "1"]);
    assert_eq!(rows[5], ["versions", "2"]);
    assert_eq!(rows[6], ["urls", "1"]);
}

#[test]
fn test_add_mirror_to_existing_version() {
    let ctx = TestContext::with_snapshot();
    let mirror = "https://mirror.example.com/notes-1.ipa";
    ctx.stdout(&[
        "add",
        "--bundle",
        "com.example.notes",
        "--version",
        "1.0",
        "--min-os",
        "6.0",
        "--url",
        mirror,
    ]);

    let stdout = ctx.stdout(&["check-url", mirror]);
    assert!(stdout.contains("known"));

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(ctx.snapshot()).unwrap()).unwrap();
    let notes = written
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["bundle"] == "com.example.notes")
        .unwrap();
    let v1 = notes["versions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["ver"] == "1.0")
        .unwrap();
    assert_eq!(v1["urls"][0]["url"], "http://old.example.com/notes-1.ipa");
    assert_eq!(v1["urls"][1]["url"], mirror);

    let output = ctx.run(&[
        "add",
        "--bundle",
        "com.example.notespro",
        "--version",
        "3.0",
        "--min-os",
        "12.0",
        "--url",
        mirror,
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_add_creates_snapshot() {
    let ctx = TestContext::new();
    ctx.stdout(&[
        "add",
        "--bundle",
        "com.example.fresh",
        "--name",
        "Fresh",
        "--version",
        "1.0",
        "--min-os",
        "10.0",
        "--url",
        "https://a.example.com/fresh.ipa",
        "--size",
        "4096",
    ]);
    assert!(ctx.snapshot().exists());

    let stdout = ctx.stdout(&["list", "--os", "10.3"]);
    assert!(stdout.contains("Fresh"));
    let stdout = ctx.stdout(&["list", "--os", "9.0"]);
    assert!(!stdout.contains("Fresh"));
}

#[test]
fn test_compact_writes_zstd() {
    let ctx = TestContext::with_snapshot();
    let out = ctx.home.join("apps.json.zst");
    ctx.stdout(&["compact", "--compress", "--output", out.to_str().unwrap()]);

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..4], &[0x28, 0xB5, 0x2F, 0xFD]);

    let stdout = ctx.stdout(&["--snapshot", out.to_str().unwrap(), "search", "notes"]);
    assert!(stdout.contains("com.example.notespro"));
}

#[test]
fn test_add_keeps_packages_hidden_by_load_filters() {
    let ctx = TestContext::new();
    std::fs::write(ctx.home.join("config.toml"), "[load]\nskip_empty_artwork = true\n").unwrap();
    std::fs::write(
        ctx.snapshot(),
        r#"[
          {"name":"NoArt","bundle":"com.example.noart","versions":[
            {"ver":"1.0","support":"6.0","urls":[
              {"url":"https://a/noart.ipa","bv":"1","fs":1,"bin":{"arm64":false,"arm99":true}}]}]},
          {"name":"Art","bundle":"com.example.art","art":"https://a/icon.png","versions":[]}
        ]"#,
    )
    .unwrap();

    let listed = ctx.stdout(&["list"]);
    assert!(!listed.contains("com.example.noart"));

    ctx.stdout(&add_args("com.example.art", "2.0", "https://a/art-2.ipa"));

    let written = read_snapshot(&ctx);
    let packages = written.as_array().unwrap();
    assert_eq!(packages.len(), 2);
    let noart = packages
        .iter()
        .find(|p| p["bundle"] == "com.example.noart")
        .expect("filtered package must survive add");
    assert!(noart.get("dev").is_none());
    assert!(noart.get("art").is_none());
    assert_eq!(noart["versions"][0]["urls"][0]["bin"]["arm99"], true);
}

#[test]
fn test_add_refuses_to_drop_malformed_records() {
    let ctx = TestContext::new();
    let snapshot = r#"[
      {"bundle":"com.example.broken","versions":[]},
      {"name":"Good","bundle":"com.example.good","versions":[]}
    ]"#;
    std::fs::write(ctx.snapshot(), snapshot).unwrap();

    let args = add_args("com.example.good", "1.0", "https://a/good.ipa");
    let output = ctx.run(&args);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));
    assert_eq!(std::fs::read_to_string(ctx.snapshot()).unwrap(), snapshot);

    let mut forced = args.clone();
    forced.push("--force");
    ctx.stdout(&forced);
    let written = read_snapshot(&ctx);
    assert_eq!(written.as_array().unwrap().len(), 1);
    assert_eq!(written[0]["bundle"], "com.example.good");
}
