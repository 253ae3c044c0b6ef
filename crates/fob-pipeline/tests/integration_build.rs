//! Integration tests for the build orchestrator.
//!
//! Each test lays out a small front-end project in a temp directory and runs
//! the pipeline against it in an explicit mode.

use fob_pipeline::config::PipelineConfig;
use fob_pipeline::manifest::Manifest;
use fob_pipeline::{Mode, Pipeline, Step};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Project {
    temp: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn pipeline(&self, mode: Mode) -> Pipeline {
        let config = PipelineConfig::default().resolve(self.root());
        Pipeline::new(config, mode)
    }

    fn out(&self, rel: &str) -> PathBuf {
        self.root().join("public").join(rel)
    }

    /// Stylesheet with an image next to it, one page and one script.
    fn site() -> Self {
        let project = Self::new();
        project.write(
            "frontend/styles/index.styl",
            "body { color: red; background: url(icon.png); }\n",
        );
        project.write("frontend/styles/icon.png", [0x89, b'P', b'N', b'G']);
        project.write(
            "frontend/assets/index.html",
            r#"<html><head><link rel="stylesheet" href="/styles/index.css"></head><body></body></html>"#,
        );
        project.write("frontend/js/lib/greet.js", "export const greet = (n) => `hi ${n}`;\n");
        project.write(
            "frontend/js/main.js",
            "import { greet } from './lib/greet.js';\nconsole.log(greet('there'));\n",
        );
        project
    }
}

#[tokio::test]
async fn test_development_build_writes_unhashed_outputs() {
    let project = Project::site();

    let summary = project.pipeline(Mode::Development).build().await.unwrap();
    assert!(summary.is_success(), "{:?}", summary.failed_steps());

    let css = fs::read_to_string(project.out("styles/index.css")).unwrap();
    assert!(css.contains("sourceMappingURL=index.css.map"));
    assert!(project.out("styles/index.css.map").exists());
    assert!(project.out("styles/icon.png").exists());
    assert!(project.out("js/main.js").exists());
    assert!(project.out("index.html").exists());

    assert!(!project.root().join("manifest").exists());
}

#[tokio::test]
async fn test_default_layout_stylus_entry_with_image() {
    let project = Project::new();
    project.write(
        "frontend/styles/index.styl",
        "body { background: url(icon.png) no-repeat; }\n",
    );
    project.write("frontend/styles/icon.png", [0x89, b'P', b'N', b'G']);

    let summary = project.pipeline(Mode::Development).build().await.unwrap();
    assert!(summary.is_success(), "{:?}", summary.failed_steps());

    let styles_report = summary.reports.iter().find(|r| r.step == "styles").unwrap();
    assert_eq!(styles_report.files_written, 2);

    let css = fs::read_to_string(project.out("styles/index.css")).unwrap();
    assert!(css.contains("icon.png"));
    assert!(project.out("styles/index.css.map").exists());
    assert!(project.out("styles/icon.png").exists());
    assert!(!project.root().join("manifest").exists());
}

#[tokio::test]
async fn test_build_runs_steps_in_order() {
    let project = Project::site();

    let summary = project.pipeline(Mode::Development).build().await.unwrap();
    let steps: Vec<&str> = summary.reports.iter().map(|r| r.step.as_str()).collect();
    assert_eq!(steps, ["clean", "styles-assets", "styles", "scripts", "assets"]);
}

#[tokio::test]
async fn test_build_cleans_stale_outputs() {
    let project = Project::site();
    project.write("public/stale.txt", "old");

    project.pipeline(Mode::Development).build().await.unwrap();

    assert!(!project.out("stale.txt").exists());
    assert!(project.out("index.html").exists());
}

#[tokio::test]
async fn test_production_build_writes_manifests() {
    let project = Project::site();

    let summary = project.pipeline(Mode::Production).build().await.unwrap();
    assert!(summary.is_success(), "{:?}", summary.failed_steps());

    let css_manifest = Manifest::load_or_default(&project.root().join("manifest/css.json")).unwrap();
    assert_eq!(css_manifest.len(), 1);
    let hashed_css = css_manifest.get("index.css").unwrap();
    assert!(hashed_css.starts_with("index-") && hashed_css.ends_with(".css"));
    assert!(project.out("styles").join(hashed_css).exists());
    assert!(!project.out("styles/index.css.map").exists());

    let js_manifest =
        Manifest::load_or_default(&project.root().join("manifest/webpack.json")).unwrap();
    assert_eq!(js_manifest.len(), 1);
    let hashed_js = js_manifest.get("main.js").unwrap();
    assert!(!hashed_js.starts_with("/js/"));
    assert!(project.out("js").join(hashed_js).exists());
}

#[tokio::test]
async fn test_production_assets_reference_hashed_stylesheet() {
    let project = Project::site();

    project.pipeline(Mode::Production).build().await.unwrap();

    let manifest = Manifest::load_or_default(&project.root().join("manifest/css.json")).unwrap();
    let hashed = manifest.get("index.css").unwrap();

    let html = fs::read_to_string(project.out("index.html")).unwrap();
    assert!(html.contains(&format!("/styles/{}", hashed)));
    assert!(!html.contains("/styles/index.css\""));
}

#[tokio::test]
async fn test_style_error_does_not_stop_other_steps() {
    let project = Project::site();
    project.write("frontend/styles/index.styl", "body { background: url(missing.png); }\n");

    let summary = project.pipeline(Mode::Development).build().await.unwrap();

    assert_eq!(summary.failed_steps(), vec!["styles".to_string()]);
    assert!(project.out("js/main.js").exists());
    assert!(project.out("index.html").exists());
    assert!(summary.into_result().is_err());
}

#[tokio::test]
async fn test_script_error_keeps_previous_bundle() {
    let project = Project::site();
    let pipeline = project.pipeline(Mode::Development);

    pipeline.run(Step::Scripts).await.unwrap();
    let before = fs::read_to_string(project.out("js/main.js")).unwrap();

    project.write("frontend/js/main.js", "import { nope } from './missing.js';\nnope();\n");
    let report = pipeline.run(Step::Scripts).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(fs::read_to_string(project.out("js/main.js")).unwrap(), before);
}

#[tokio::test]
async fn test_script_modules_track_bundle_graph() {
    let project = Project::site();
    let pipeline = project.pipeline(Mode::Development);

    pipeline.run(Step::Scripts).await.unwrap();

    let modules = pipeline.script_modules();
    assert!(modules.iter().any(|m| m.ends_with("lib/greet.js")), "{:?}", modules);
}

#[tokio::test]
async fn test_each_entry_becomes_one_bundle() {
    let project = Project::site();
    project.write("frontend/js/admin.js", "import { greet } from './lib/greet.js';\ngreet('admin');\n");

    let report = project.pipeline(Mode::Development).run(Step::Scripts).await.unwrap();

    assert_eq!(report.files_written, 2);
    assert!(project.out("js/admin.js").exists());
    assert!(!project.out("js/greet.js").exists());
}

#[tokio::test]
async fn test_empty_project_builds() {
    let project = Project::new();

    let summary = project.pipeline(Mode::Production).build().await.unwrap();
    assert!(summary.is_success());
}

#[tokio::test]
async fn test_development_build_drops_production_manifests() {
    let project = Project::site();

    project.pipeline(Mode::Production).build().await.unwrap();
    assert!(project.root().join("manifest/css.json").exists());

    project.pipeline(Mode::Development).build().await.unwrap();

    assert!(!project.root().join("manifest/css.json").exists());
    assert!(!project.root().join("manifest/webpack.json").exists());
    let html = fs::read_to_string(project.out("index.html")).unwrap();
    assert!(html.contains("/styles/index.css\""));
}

#[tokio::test]
async fn test_failed_style_build_never_links_stale_hash() {
    let project = Project::site();

    project.pipeline(Mode::Production).build().await.unwrap();
    let old = Manifest::load_or_default(&project.root().join("manifest/css.json")).unwrap();
    let old_hashed = old.get("index.css").unwrap().to_string();

    project.write("frontend/styles/index.styl", "body { background: url(missing.png); }\n");
    let summary = project.pipeline(Mode::Production).build().await.unwrap();
    assert_eq!(summary.failed_steps(), vec!["styles".to_string()]);

    assert!(!project.root().join("manifest/css.json").exists());
    let html = fs::read_to_string(project.out("index.html")).unwrap();
    assert!(!html.contains(&old_hashed), "{}", html);
    assert!(html.contains("/styles/index.css\""));
}
