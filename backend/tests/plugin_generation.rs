//! End-to-end plugin generation over the real filesystem workspace.

mod harness;

use std::io::Read;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use devassist::test_support::cap_fs::{list_names, path_exists, read_file, read_file_to_string};
use harness::{Harness, admin_get, admin_post};
use rstest::rstest;
use serde_json::{Value, json};

const REPLY: &str = "Here is your plugin.\n\n```acme-notes.php```\n<?php\n/*\n * Plugin Name: Acme Notes\n */\nrequire __DIR__ . '/includes/admin.php';\n```\n\n```includes/admin.php```\n<?php\nadd_action('admin_menu', 'acme_notes_menu');\n```\n";

fn plugin_body(slug: &str) -> Value {
    json!({
        "plugin_name": "Acme Notes",
        "plugin_slug": slug,
        "plugin_description": "Sticky notes for the dashboard",
        "plugin_author": "Acme",
        "plugin_prompt": "Add a dashboard widget for notes.",
        "plugin_components": ["settings", "shortcode"]
    })
}

#[rstest]
#[actix_web::test]
async fn generated_plugin_is_published_and_archived() {
    let harness = Harness::start().await;
    harness.reply_with(REPLY).await;
    let app = actix_test::init_service(harness.app()).await;

    let response = actix_test::call_service(
        &app,
        admin_post("/api/v1/generate-plugin", plugin_body("acme-notes")).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Plugin generated successfully!");
    assert_eq!(body["files"], json!(["acme-notes.php", "includes/admin.php"]));

    let plugin_dir = harness.path("plugins/acme-notes");
    assert_eq!(body["plugin_dir"], plugin_dir.display().to_string());
    assert_eq!(
        read_file_to_string(&plugin_dir.join("includes/admin.php")).expect("admin include"),
        "<?php\nadd_action('admin_menu', 'acme_notes_menu');\n"
    );
    assert_eq!(
        list_names(&harness.path("plugins")).expect("plugins root"),
        ["acme-notes", "acme-notes.zip"]
    );

    let bytes = read_file(&harness.path("plugins/acme-notes.zip")).expect("zip");
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");
    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    assert_eq!(names, ["acme-notes/acme-notes.php", "acme-notes/includes/admin.php"]);
    let mut main = String::new();
    archive
        .by_name("acme-notes/acme-notes.php")
        .expect("main entry")
        .read_to_string(&mut main)
        .expect("utf-8 entry");
    assert!(main.contains("Plugin Name: Acme Notes"));
}

#[rstest]
#[actix_web::test]
async fn repeated_slug_is_a_conflict() {
    let harness = Harness::start().await;
    harness.reply_with(REPLY).await;
    let app = actix_test::init_service(harness.app()).await;

    let first = actix_test::call_service(
        &app,
        admin_post("/api/v1/generate-plugin", plugin_body("acme-notes")).to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = actix_test::call_service(
        &app,
        admin_post("/api/v1/generate-plugin", plugin_body("acme-notes")).to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(second).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "conflict");

    let calls = harness.llm.received_requests().await.expect("recording on");
    assert_eq!(calls.len(), 1, "the model is not consulted for a taken slug");
}

#[rstest]
#[actix_web::test]
async fn reply_without_file_blocks_writes_nothing() {
    let harness = Harness::start().await;
    harness.reply_with("I cannot help with that.").await;
    let app = actix_test::init_service(harness.app()).await;

    let response = actix_test::call_service(
        &app,
        admin_post("/api/v1/generate-plugin", plugin_body("acme-notes")).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "parse_failure");
    assert!(!path_exists(&harness.path("plugins/acme-notes")));
}

#[rstest]
#[actix_web::test]
async fn escaping_paths_are_rejected_before_publishing() {
    let harness = Harness::start().await;
    harness
        .reply_with("```../evil.php```\n<?php echo 'x';\n```")
        .await;
    let app = actix_test::init_service(harness.app()).await;

    let response = actix_test::call_service(
        &app,
        admin_post("/api/v1/generate-plugin", plugin_body("acme-notes")).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!path_exists(&harness.path("evil.php")));
    assert!(!path_exists(&harness.path("plugins/acme-notes")));
}

#[rstest]
#[actix_web::test]
async fn generated_plugin_shows_up_in_history() {
    let harness = Harness::start().await;
    harness.reply_with(REPLY).await;
    let app = actix_test::init_service(harness.app()).await;

    let response = actix_test::call_service(
        &app,
        admin_post("/api/v1/generate-plugin", plugin_body("acme-notes")).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let history =
        actix_test::call_service(&app, admin_get("/api/v1/get-history").to_request()).await;
    let body: Value = actix_test::read_body_json(history).await;
    let entries = body["history"].as_array().expect("history array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["language"], "php");
    assert_eq!(entries[0]["response"], REPLY);
    assert!(
        entries[0]["prompt"]
            .as_str()
            .is_some_and(|prompt| prompt.contains("Add a dashboard widget for notes."))
    );
}
