//! Tests for the plugin generation pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    Completion, FixtureSettingsRepository, MockHistoryRepository, MockLlmClient,
    MockPluginWorkspace,
};
use crate::domain::{
    ErrorCode, HistoryEntry, NewHistoryEntry, Options, PluginFeature, PluginSlug, RetentionLimit,
    Secret,
};

const DEMO_REPLY: &str = "Here you go:\n\n```demo-plugin.php```\n<?php\n/* Plugin Name: Demo */\nadd_shortcode('hi', fn() => 'Hello');\n```\n";

type Service = PluginGenerationService<
    MockLlmClient,
    MockPluginWorkspace,
    MockHistoryRepository,
    FixtureSettingsRepository,
>;

#[fixture]
fn blueprint() -> PluginBlueprint {
    PluginBlueprint {
        name: "Demo".to_owned(),
        slug: PluginSlug::new("demo-plugin").expect("slug"),
        description: String::new(),
        author: String::new(),
        requirements: "add a shortcode [hi] that prints Hello".to_owned(),
        features: vec![PluginFeature::Shortcode],
    }
}

fn configured() -> Arc<FixtureSettingsRepository> {
    Arc::new(FixtureSettingsRepository::new(Options {
        api_key: Secret::new("sk-test"),
        ..Options::default()
    }))
}

fn replying(text: &'static str) -> MockLlmClient {
    let mut llm = MockLlmClient::new();
    llm.expect_complete()
        .withf(|req| req.system == Language::Php.system_prompt())
        .times(1)
        .returning(move |_| {
            Ok(Completion {
                text: text.to_owned(),
            })
        });
    llm
}

fn fresh_workspace() -> MockPluginWorkspace {
    let mut workspace = MockPluginWorkspace::new();
    workspace.expect_exists().returning(|_| Ok(false));
    workspace
}

fn stored(entry: &NewHistoryEntry) -> HistoryEntry {
    HistoryEntry {
        id: 1,
        prompt: entry.prompt.clone(),
        response: entry.response.clone(),
        language: entry.language.clone(),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

fn accepting_history() -> MockHistoryRepository {
    let mut history = MockHistoryRepository::new();
    history.expect_insert().returning(|entry| Ok(stored(entry)));
    history.expect_trim_to().returning(|_| Ok(0));
    history
}

fn service_with_history(
    llm: MockLlmClient,
    workspace: MockPluginWorkspace,
    history: MockHistoryRepository,
) -> Service {
    PluginGenerationService::new(
        Arc::new(llm),
        Arc::new(workspace),
        Arc::new(history),
        configured(),
    )
}

fn service(llm: MockLlmClient, workspace: MockPluginWorkspace) -> Service {
    service_with_history(llm, workspace, accepting_history())
}

#[rstest]
#[tokio::test]
async fn publishes_and_archives_parsed_files(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace
        .expect_materialize()
        .withf(|slug, files| {
            let expected = "<?php\n/* Plugin Name: Demo */\nadd_shortcode('hi', fn() => 'Hello');\n";
            slug.as_str() == "demo-plugin"
                && files.len() == 1
                && files.iter().all(|(path, content)| {
                    path.as_str() == "demo-plugin.php" && content == expected
                })
        })
        .times(1)
        .return_once(|_, _| Ok(PathBuf::from("/plugins/demo-plugin")));
    workspace
        .expect_archive()
        .times(1)
        .return_once(|_| Ok(PathBuf::from("/plugins/demo-plugin.zip")));

    let generated = service(replying(DEMO_REPLY), workspace)
        .generate(blueprint)
        .await
        .expect("generation succeeds");

    assert_eq!(generated.plugin_dir, "/plugins/demo-plugin");
    assert_eq!(generated.zip_file.as_deref(), Some("/plugins/demo-plugin.zip"));
    assert_eq!(generated.files, vec!["demo-plugin.php".to_owned()]);
    assert!(generated.archive_error.is_none());
}

#[rstest]
#[tokio::test]
async fn completed_generation_is_recorded_as_php_history(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace
        .expect_materialize()
        .return_once(|_, _| Ok(PathBuf::from("/plugins/demo-plugin")));
    workspace
        .expect_archive()
        .return_once(|_| Ok(PathBuf::from("/plugins/demo-plugin.zip")));
    let mut history = MockHistoryRepository::new();
    history
        .expect_insert()
        .withf(|entry| {
            entry.language == Language::Php
                && entry.prompt.contains("add a shortcode [hi] that prints Hello")
                && entry.response == DEMO_REPLY
        })
        .times(1)
        .returning(|entry| Ok(stored(entry)));
    history
        .expect_trim_to()
        .withf(|keep| *keep == RetentionLimit::DEFAULT)
        .times(1)
        .returning(|_| Ok(0));

    service_with_history(replying(DEMO_REPLY), workspace, history)
        .generate(blueprint)
        .await
        .expect("generation succeeds");
}

#[rstest]
#[tokio::test]
async fn conflicting_slug_records_no_history(blueprint: PluginBlueprint) {
    let mut workspace = MockPluginWorkspace::new();
    workspace.expect_exists().returning(|_| Ok(true));
    let mut llm = MockLlmClient::new();
    llm.expect_complete().never();
    let mut history = MockHistoryRepository::new();
    history.expect_insert().never();

    let error = service_with_history(llm, workspace, history)
        .generate(blueprint)
        .await
        .expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn archive_failure_is_soft(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace
        .expect_materialize()
        .return_once(|_, _| Ok(PathBuf::from("/plugins/demo-plugin")));
    workspace
        .expect_archive()
        .return_once(|_| Err(PluginWorkspaceError::archive("disk full")));

    let generated = service(replying(DEMO_REPLY), workspace)
        .generate(blueprint)
        .await
        .expect("generation still succeeds");

    assert!(generated.zip_file.is_none());
    assert_eq!(
        generated.archive_error.as_deref(),
        Some("failed to build plugin archive: disk full")
    );
}

#[rstest]
#[tokio::test]
async fn existing_slug_conflicts_before_calling_the_model(blueprint: PluginBlueprint) {
    let mut llm = MockLlmClient::new();
    llm.expect_complete().never();
    let mut workspace = MockPluginWorkspace::new();
    workspace.expect_exists().return_once(|_| Ok(true));
    workspace.expect_materialize().never();

    let error = service(llm, workspace)
        .generate(blueprint)
        .await
        .expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn reply_without_blocks_is_a_parse_failure(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace.expect_materialize().never();

    let error = service(replying("I cannot help with that."), workspace)
        .generate(blueprint)
        .await
        .expect_err("parse failure");
    assert_eq!(error.code(), ErrorCode::ParseFailure);
}

#[rstest]
#[tokio::test]
async fn traversal_paths_fail_the_whole_generation(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace.expect_materialize().never();
    let reply = "```demo-plugin.php```\n<?php\n```\n```../../wp-config.php```\n<?php evil();\n```";

    let error = service(replying(reply), workspace)
        .generate(blueprint)
        .await
        .expect_err("unsafe path");
    assert_eq!(error.code(), ErrorCode::ParseFailure);
    assert!(error.details().is_some());
}

#[rstest]
#[tokio::test]
async fn file_count_bound_is_enforced(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace.expect_materialize().never();
    let reply = "```a.php```\n1\n```\n```b.php```\n2\n```";
    let svc = service(replying(reply), workspace).with_limits(ParseLimits {
        max_files: 1,
        max_file_bytes: 1024,
    });

    let error = svc.generate(blueprint).await.expect_err("too many files");
    assert_eq!(error.code(), ErrorCode::ParseFailure);
    assert_eq!(error.details().expect("details")["limit"], 1);
}

#[rstest]
#[tokio::test]
async fn concurrent_winner_is_reported_as_conflict(blueprint: PluginBlueprint) {
    let mut workspace = fresh_workspace();
    workspace
        .expect_materialize()
        .return_once(|slug, _| Err(PluginWorkspaceError::already_exists(slug.as_str())));
    workspace.expect_archive().never();

    let error = service(replying(DEMO_REPLY), workspace)
        .generate(blueprint)
        .await
        .expect_err("lost the race");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn blank_requirements_are_rejected(mut blueprint: PluginBlueprint) {
    blueprint.requirements = "  ".to_owned();
    let mut llm = MockLlmClient::new();
    llm.expect_complete().never();

    let error = service(llm, MockPluginWorkspace::new())
        .generate(blueprint)
        .await
        .expect_err("validation");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().expect("details")["field"], "plugin_prompt");
}
