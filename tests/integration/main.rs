//! Integration tests for layered-styles

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A throwaway site tree with a config file pointing into it
    struct Site {
        temp: TempDir,
        config: PathBuf,
    }

    impl Site {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path();

            fs::create_dir_all(root.join("content/plugins/forms")).unwrap();
            fs::write(
                root.join("content/plugins/forms/forms.css"),
                ".form{margin:0}",
            )
            .unwrap();
            fs::write(root.join("demo.css"), "body{color:red}").unwrap();

            let config = root.join("config.toml");
            fs::write(
                &config,
                format!(
                    r#"
[general]
audit_log = true
state_dir = "{root}/state"

[site]
url = "https://example.com"
install_dir = "{root}"
content_dir = "{root}/content"
uploads_dir = "{root}/content/uploads"
uploads_url = "https://example.com/content/uploads"

[layer]
name = "plugin-styles"

[[stylesheets]]
handle = "demo"
source = "{root}/demo.css"
enabled = true

[[stylesheets]]
handle = "forms"
source = "plugins/forms/forms.css"
enabled = true
"#,
                    root = root.display()
                ),
            )
            .unwrap();

            fs::write(
                root.join("registry.json"),
                r#"{
                    "styles": {
                        "demo": {"src": "https://example.com/demo.css", "ver": "1.0"},
                        "forms": {"src": "https://example.com/content/plugins/forms/forms.css"},
                        "theme": {"src": "https://example.com/content/themes/site/style.css"}
                    },
                    "queue": ["demo", "forms", "theme"]
                }"#,
            )
            .unwrap();

            Self { temp, config }
        }

        fn root(&self) -> &Path {
            self.temp.path()
        }

        fn cache_dir(&self) -> PathBuf {
            self.root().join("content/uploads/layered-styles")
        }

        fn cmd(&self) -> Command {
            let mut cmd = layered_styles();
            cmd.arg("--config").arg(&self.config);
            cmd
        }

        fn render(&self) -> Command {
            let mut cmd = self.cmd();
            cmd.arg("render")
                .arg("--registry")
                .arg(self.root().join("registry.json"));
            cmd
        }
    }

    fn layered_styles() -> Command {
        cargo_bin_cmd!("layered-styles")
    }

    #[test]
    fn help_displays() {
        layered_styles()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("cascade layer"));
    }

    #[test]
    fn version_displays() {
        layered_styles()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("layered-styles"));
    }

    #[test]
    fn init_writes_config_and_cache_dir() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("conf").join("config.toml");

        layered_styles()
            .arg("--config")
            .arg(&config)
            .arg("init")
            .current_dir(temp.path())
            .assert()
            .success();

        let written = fs::read_to_string(&config).unwrap();
        assert!(written.contains("name = \"plugin-styles\""));
        assert!(temp
            .path()
            .join("content/uploads/layered-styles/.htaccess")
            .exists());
    }

    #[test]
    fn render_plain_lists_final_queue() {
        let site = Site::new();

        site.render()
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout("theme\ndemo-layered\nforms-layered\n");

        let cached = fs::read_to_string(site.cache_dir().join("demo-layered.css")).unwrap();
        assert!(cached.contains("@layer plugin-styles {\nbody{color:red}\n}"));
        assert!(site.cache_dir().join("forms-layered.css").exists());
    }

    #[test]
    fn render_json_reports_versions() {
        let site = Site::new();

        let output = site.render().args(["--format", "json"]).output().unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let layered = json["report"]["layered"].as_array().unwrap();
        assert_eq!(layered.len(), 2);
        assert_eq!(layered[0]["layered_handle"], "demo-layered");
        assert!(layered[0]["url"]
            .as_str()
            .unwrap()
            .ends_with("/layered-styles/demo-layered.css"));

        let version = layered[0]["version"].as_u64().unwrap();
        let queue = json["queue"].as_array().unwrap();
        let demo = queue
            .iter()
            .find(|q| q["handle"] == "demo-layered")
            .unwrap();
        assert_eq!(demo["ver"], version.to_string());
        assert!(queue.iter().all(|q| q["handle"] != "demo"));
    }

    #[test]
    fn render_skips_missing_sources() {
        let site = Site::new();
        fs::remove_file(site.root().join("demo.css")).unwrap();

        site.render()
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout("theme\nforms-layered\n");
    }

    #[test]
    fn render_survives_unwritable_cache_dir() {
        let site = Site::new();
        fs::write(site.root().join("content/uploads"), "not a directory").unwrap();

        site.render()
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout("theme\n")
            .stderr(predicate::str::contains("Skipping stylesheet demo"));
    }

    #[test]
    fn render_captures_handles() {
        let site = Site::new();
        site.render().assert().success();

        site.cmd()
            .args(["handles", "--format", "plain"])
            .assert()
            .success()
            .stdout("demo-layered\nforms-layered\ntheme\n");

        site.cmd()
            .args(["entry", "add", "theme", "--from-snapshot"])
            .assert()
            .success();

        let config = fs::read_to_string(&site.config).unwrap();
        assert!(config.contains("content/themes/site/style.css"));
    }

    #[test]
    fn no_snapshot_leaves_state_alone() {
        let site = Site::new();
        site.render().arg("--no-snapshot").assert().success();
        assert!(!site.root().join("state/registered-styles.json").exists());
    }

    #[test]
    fn generate_prints_url() {
        let site = Site::new();

        site.cmd()
            .args(["generate", "forms", "/plugins/forms/forms.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "https://example.com/content/uploads/layered-styles/forms-layered.css",
            ));
    }

    #[test]
    fn generate_missing_source_fails() {
        let site = Site::new();

        site.cmd()
            .args(["generate", "ghost", "nowhere.css"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Source stylesheet not found"));
        assert!(!site.cache_dir().join("ghost-layered.css").exists());
    }

    #[test]
    fn cache_clear_removes_files() {
        let site = Site::new();
        site.render().assert().success();

        site.cmd()
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("demo-layered.css\nforms-layered.css\n");

        site.cmd()
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared 2"));

        assert!(!site.cache_dir().join("demo-layered.css").exists());
        assert!(site.cache_dir().join(".htaccess").exists());

        let audit = fs::read_to_string(site.root().join("state/audit.log")).unwrap();
        assert!(audit.contains("cache.cleared"));
    }

    #[test]
    fn cache_clear_without_confirmation_aborts() {
        let site = Site::new();
        site.render().assert().success();

        site.cmd().args(["cache", "clear"]).assert().success();
        assert!(site.cache_dir().join("demo-layered.css").exists());
    }

    #[test]
    fn entry_lifecycle() {
        let site = Site::new();

        site.cmd()
            .args(["entry", "disable", "forms"])
            .assert()
            .success();
        site.cmd()
            .args(["entry", "add", "extra", "extra.css"])
            .assert()
            .success();

        let output = site
            .cmd()
            .args(["entry", "list", "--format", "json"])
            .output()
            .unwrap();
        let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(entries.as_array().unwrap().len(), 3);
        assert_eq!(entries[1]["enabled"], false);
        assert_eq!(entries[2]["handle"], "extra");

        site.cmd()
            .args(["entry", "remove", "extra"])
            .assert()
            .success();
        site.cmd()
            .args(["entry", "remove", "extra"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Stylesheet entry not found"));
    }

    #[test]
    fn duplicate_entry_rejected() {
        let site = Site::new();

        site.cmd()
            .args(["entry", "add", "demo", "other.css"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("more than once"));
    }

    #[test]
    fn config_set_layer_name() {
        let site = Site::new();
        site.render().assert().success();

        site.cmd()
            .args(["config", "set", "layer.name", "vendor"])
            .assert()
            .success();
        site.cmd()
            .args(["config", "set", "layer.name", "not valid"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid layer name"));

        site.render().assert().success();
        let cached = fs::read_to_string(site.cache_dir().join("demo-layered.css")).unwrap();
        assert!(cached.contains("@layer vendor {"));
    }

    #[test]
    fn config_path_and_show() {
        let site = Site::new();

        site.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
        site.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[layer]"));
    }

    #[test]
    fn invalid_registry_fails() {
        let site = Site::new();
        fs::write(site.root().join("registry.json"), "[1, 2").unwrap();

        site.render()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid style registry"));
    }
}
