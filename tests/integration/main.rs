//! Integration tests for packager-fetch


mod cli_tests {
    use super::server;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use packager_fetch::digest::sha256_hex;
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const RELEASE: &[u8] = b"<html><body>released packager</body></html>";
    const DEST: &str = "src-renderer/packager/standalone.html";

    /// Workspace layout: `<temp>/app` is the project root, `<temp>/packager`
    /// is where a sibling packager checkout would live.
    struct Workspace {
        temp: TempDir,
    }

    impl Workspace {
        fn new(src: &str, sha256: &str) -> Self {
            let temp = TempDir::new().unwrap();
            let scripts = temp.path().join("app/scripts");
            fs::create_dir_all(&scripts).unwrap();
            fs::write(
                scripts.join("packager.json"),
                format!(r#"{{"src": "{}", "sha256": "{}"}}"#, src, sha256),
            )
            .unwrap();
            Self { temp }
        }

        fn root(&self) -> PathBuf {
            self.temp.path().join("app")
        }

        fn packager(&self) -> PathBuf {
            self.temp.path().join("packager")
        }

        fn dest(&self) -> PathBuf {
            self.root().join(DEST)
        }

        fn write(&self, path: &Path, bytes: &[u8]) {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, bytes).unwrap();
        }

        fn cmd(&self) -> Command {
            let mut cmd = packager_fetch();
            cmd.current_dir(self.root())
                .env_remove("MISTWARP_PACKAGER_DIR")
                .env_remove("PACKAGER_FETCH_CONFIG")
                .env_remove("RUST_LOG");
            cmd
        }
    }

    fn packager_fetch() -> Command {
        cargo_bin_cmd!("packager-fetch")
    }

    #[test]
    fn help_displays() {
        packager_fetch()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("standalone packager bundle"))
            .stdout(predicate::str::contains("MISTWARP_PACKAGER_DIR"));
    }

    #[test]
    fn version_displays() {
        packager_fetch()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("packager-fetch"));
    }

    #[test]
    fn downloads_when_no_local_packager() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));

        ws.cmd()
            .assert()
            .success()
            .stderr(predicate::str::contains("Downloading"));

        assert_eq!(fs::read(ws.dest()).unwrap(), RELEASE);
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn hash_mismatch_fails_without_writing() {
        let server = server::start(b"<html>tampered</html>".to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));

        ws.cmd()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Hash mismatch"));

        assert!(!ws.dest().exists());
    }

    #[test]
    fn hash_mismatch_keeps_previous_file() {
        let server = server::start(b"<html>tampered</html>".to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));
        ws.write(&ws.dest(), b"<html>older release</html>");

        ws.cmd().assert().code(1);

        assert_eq!(fs::read(ws.dest()).unwrap(), b"<html>older release</html>");
    }

    #[test]
    fn cached_file_skips_download() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        ws.write(&ws.dest(), RELEASE);

        ws.cmd()
            .assert()
            .success()
            .stderr(predicate::str::contains("Packager already updated"));

        assert_eq!(fs::read(ws.dest()).unwrap(), RELEASE);
    }

    #[test]
    fn prebuilt_local_packager_is_copied() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        ws.write(&ws.packager().join("package.json"), b"{}");
        ws.write(
            &ws.packager().join("dist/standalone.html"),
            b"<html>local build</html>",
        );

        ws.cmd()
            .assert()
            .success()
            .stderr(predicate::str::contains("Using local packager"));

        assert_eq!(fs::read(ws.dest()).unwrap(), b"<html>local build</html>");
    }

    #[test]
    fn packager_dir_from_environment() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        let elsewhere = ws.temp.path().join("checkouts/packager");
        ws.write(&elsewhere.join("package.json"), b"{}");
        ws.write(&elsewhere.join("dist/standalone.html"), b"<html>env</html>");

        ws.cmd()
            .env("MISTWARP_PACKAGER_DIR", &elsewhere)
            .assert()
            .success();

        assert_eq!(fs::read(ws.dest()).unwrap(), b"<html>env</html>");
    }

    #[test]
    fn no_local_forces_download() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));
        ws.write(&ws.packager().join("package.json"), b"{}");
        ws.write(&ws.packager().join("dist/standalone.html"), b"<html>local</html>");

        ws.cmd().arg("--no-local").assert().success();

        assert_eq!(fs::read(ws.dest()).unwrap(), RELEASE);
    }

    #[cfg(unix)]
    #[test]
    fn builds_local_packager_with_configured_package_manager() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        ws.write(&ws.packager().join("package.json"), b"{}");
        ws.write(
            &ws.root().join("packager-fetch.toml"),
            br#"
[local]
package_manager = "sh"
install_args = ["-c", "mkdir node_modules"]
build_args = ["-c", "mkdir -p dist && printf built > dist/standalone.html"]
"#,
        );

        ws.cmd()
            .assert()
            .success()
            .stderr(predicate::str::contains("Installing packager dependencies"))
            .stderr(predicate::str::contains("Building standalone packager"));

        assert!(ws.packager().join("node_modules").is_dir());
        assert_eq!(fs::read(ws.dest()).unwrap(), b"built");
    }

    #[cfg(unix)]
    #[test]
    fn failed_local_build_falls_back_to_download() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));
        ws.write(&ws.packager().join("package.json"), b"{}");
        ws.write(
            &ws.root().join("packager-fetch.toml"),
            br#"
[local]
package_manager = "sh"
install_args = ["-c", "exit 0"]
build_args = ["-c", "exit 7"]
"#,
        );

        ws.cmd()
            .assert()
            .success()
            .stderr(predicate::str::contains("Failed to use local packager"))
            .stderr(predicate::str::contains("exit code 7"));

        assert_eq!(fs::read(ws.dest()).unwrap(), RELEASE);
    }

    #[test]
    fn unreachable_release_fails() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));

        ws.cmd()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Download of"));

        assert!(!ws.dest().exists());
    }

    #[test]
    fn invalid_metadata_fails() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        ws.write(&ws.root().join("scripts/packager.json"), b"{\"src\": 1");

        ws.cmd()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid packager metadata"));
    }

    #[test]
    fn local_build_used_whatever_the_pinned_digest() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE).to_uppercase());
        ws.write(&ws.packager().join("package.json"), b"{}");
        ws.write(
            &ws.packager().join("dist/standalone.html"),
            b"<html>local build</html>",
        );

        ws.cmd().assert().success();

        assert_eq!(fs::read(ws.dest()).unwrap(), b"<html>local build</html>");
    }

    #[test]
    fn uppercase_digest_fails_as_mismatch() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE).to_uppercase());

        ws.cmd()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Hash mismatch"));

        assert!(!ws.dest().exists());
    }

    fn assert_json_lines(stderr: &[u8]) {
        let text = String::from_utf8_lossy(stderr);
        let lines: Vec<_> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        assert!(!lines.is_empty());
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("not a JSON log line ({e}): {line}"));
            assert!(value.get("level").is_some());
        }
    }

    #[test]
    fn json_log_format_flag() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        ws.write(&ws.dest(), RELEASE);

        let output = ws
            .cmd()
            .args(["--log-format", "json"])
            .assert()
            .success()
            .get_output()
            .clone();

        assert_json_lines(&output.stderr);
        assert!(String::from_utf8_lossy(&output.stderr).contains("Packager already updated"));
    }

    #[test]
    fn json_log_format_from_config() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));
        ws.write(&ws.dest(), RELEASE);
        ws.write(
            &ws.root().join("packager-fetch.toml"),
            b"[general]\nlog_format = \"json\"\n",
        );

        let output = ws.cmd().assert().success().get_output().clone();

        assert_json_lines(&output.stderr);
    }

    #[test]
    fn config_from_environment() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));
        let config = ws.temp.path().join("ci/fetch.toml");
        ws.write(&config, b"[paths]\ndestination = \"build/bundle.html\"\n");

        ws.cmd()
            .env("PACKAGER_FETCH_CONFIG", &config)
            .assert()
            .success();

        assert_eq!(
            fs::read(ws.root().join("build/bundle.html")).unwrap(),
            RELEASE
        );
        assert!(!ws.dest().exists());
    }

    #[test]
    fn root_flag_resolves_project_paths() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));

        ws.cmd()
            .current_dir(ws.temp.path())
            .args(["--root", "app"])
            .assert()
            .success();

        assert_eq!(fs::read(ws.dest()).unwrap(), RELEASE);
    }

    #[test]
    fn local_disabled_in_config_forces_download() {
        let server = server::start(RELEASE.to_vec());
        let ws = Workspace::new(&server.url, &sha256_hex(RELEASE));
        ws.write(&ws.packager().join("package.json"), b"{}");
        ws.write(&ws.packager().join("dist/standalone.html"), b"<html>local</html>");
        ws.write(
            &ws.root().join("packager-fetch.toml"),
            b"[local]\nenabled = false\n",
        );

        ws.cmd().assert().success();

        assert_eq!(fs::read(ws.dest()).unwrap(), RELEASE);
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn missing_explicit_config_fails() {
        let ws = Workspace::new(&server::dead_url(), &sha256_hex(RELEASE));

        ws.cmd()
            .args(["--config", "nope.toml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
