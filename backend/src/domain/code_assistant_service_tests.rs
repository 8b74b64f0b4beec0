//! Tests for the code generation service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    ChatTurn, Completion, FixtureSettingsRepository, HistoryRepositoryError, LlmClientError, MockHistoryRepository,
    MockLlmClient,
};
use crate::domain::{ErrorCode, Options, RetentionLimit, Secret};

type Service = CodeAssistantService<MockLlmClient, MockHistoryRepository, FixtureSettingsRepository>;

#[fixture]
fn configured() -> Options {
    Options {
        api_key: Secret::new("sk-test"),
        max_history_items: RetentionLimit::new(3).expect("limit"),
        ..Options::default()
    }
}

fn make_service(llm: MockLlmClient, history: MockHistoryRepository, options: Options) -> Service {
    CodeAssistantService::new(
        Arc::new(llm),
        Arc::new(history),
        Arc::new(FixtureSettingsRepository::new(options)),
    )
}

fn replying(text: &'static str) -> MockLlmClient {
    let mut llm = MockLlmClient::new();
    llm.expect_complete().times(1).returning(move |_| {
        Ok(Completion {
            text: text.to_owned(),
        })
    });
    llm
}

fn request(language: Language) -> GenerateCodeRequest {
    GenerateCodeRequest {
        prompt: "write a hello world".to_owned(),
        language,
        history: Vec::new(),
    }
}

#[rstest]
#[tokio::test]
async fn records_and_trims_code_generations(configured: Options) {
    let mut history = MockHistoryRepository::new();
    history
        .expect_insert()
        .withf(|entry| entry.language == Language::Php && entry.response == "<?php echo 'hi';")
        .times(1)
        .returning(|entry| {
            Ok(HistoryEntry {
                id: 1,
                prompt: entry.prompt.clone(),
                response: entry.response.clone(),
                language: entry.language.clone(),
                created_at: Utc::now(),
            })
        });
    history
        .expect_trim_to()
        .withf(|keep| keep.get() == 3)
        .times(1)
        .return_once(|_| Ok(2));

    let service = make_service(replying("<?php echo 'hi';"), history, configured);
    let generated = service
        .generate(request(Language::Php))
        .await
        .expect("generation succeeds");

    assert_eq!(generated.content, "<?php echo 'hi';");
    assert_eq!(generated.language, Language::Php);
}

#[rstest]
#[tokio::test]
async fn text_generations_are_not_recorded(configured: Options) {
    let mut history = MockHistoryRepository::new();
    history.expect_insert().never();
    history.expect_trim_to().never();

    let service = make_service(replying("Hello!"), history, configured);
    let generated = service
        .generate(request(Language::Text))
        .await
        .expect("generation succeeds");
    assert_eq!(generated.content, "Hello!");
}

#[rstest]
#[tokio::test]
async fn history_failures_do_not_fail_generation(configured: Options) {
    let mut history = MockHistoryRepository::new();
    history
        .expect_insert()
        .times(1)
        .return_once(|_| Err(HistoryRepositoryError::connection("down")));
    history.expect_trim_to().never();

    let service = make_service(replying("print('hi')"), history, configured);
    let generated = service
        .generate(request(Language::Python))
        .await
        .expect("generation still succeeds");
    assert_eq!(generated.content, "print('hi')");
}

#[rstest]
#[tokio::test]
async fn sends_history_then_prompt_with_language_instruction(configured: Options) {
    let mut llm = MockLlmClient::new();
    llm.expect_complete()
        .withf(|req| {
            req.api_key.expose() == "sk-test"
                && req.system == Language::JavaScript.system_prompt()
                && req.messages.len() == 2
                && req.messages[0].content == "earlier"
                && req.messages[1] == ChatTurn::user("write a hello world")
        })
        .times(1)
        .return_once(|_| {
            Ok(Completion {
                text: "console.log('hi')".to_owned(),
            })
        });
    let mut history = MockHistoryRepository::new();
    history.expect_insert().returning(|entry| {
        Ok(HistoryEntry {
            id: 7,
            prompt: entry.prompt.clone(),
            response: entry.response.clone(),
            language: entry.language.clone(),
            created_at: Utc::now(),
        })
    });
    history.expect_trim_to().returning(|_| Ok(0));

    let service = make_service(llm, history, configured);
    let mut req = request(Language::JavaScript);
    req.history = vec![ChatTurn::user("earlier")];
    service.generate(req).await.expect("generation succeeds");
}

#[rstest]
#[tokio::test]
async fn rejects_disabled_languages(configured: Options) {
    let mut llm = MockLlmClient::new();
    llm.expect_complete().never();
    let service = make_service(llm, MockHistoryRepository::new(), configured);

    let error = service
        .generate(request(Language::parse("cobol").expect("tag")))
        .await
        .expect_err("language rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().expect("details")["field"], "language");
}

#[rstest]
#[tokio::test]
async fn missing_api_key_is_not_configured() {
    let mut llm = MockLlmClient::new();
    llm.expect_complete().never();
    let service = make_service(llm, MockHistoryRepository::new(), Options::default());

    let error = service
        .generate(request(Language::Php))
        .await
        .expect_err("no key");
    assert_eq!(error.code(), ErrorCode::NotConfigured);
}

#[rstest]
#[tokio::test]
async fn blank_prompt_is_rejected(configured: Options) {
    let service = make_service(MockLlmClient::new(), MockHistoryRepository::new(), configured);
    let mut req = request(Language::Php);
    req.prompt = "   ".to_owned();

    let error = service.generate(req).await.expect_err("blank prompt");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().expect("details")["field"], "prompt");
}

#[rstest]
#[tokio::test]
async fn provider_errors_surface_as_upstream_failures(configured: Options) {
    let mut llm = MockLlmClient::new();
    llm.expect_complete()
        .return_once(|_| Err(LlmClientError::upstream(401_u16, "invalid x-api-key")));
    let mut history = MockHistoryRepository::new();
    history.expect_insert().never();
    let service = make_service(llm, history, configured);

    let error = service
        .generate(request(Language::Php))
        .await
        .expect_err("upstream failure");
    assert_eq!(error.code(), ErrorCode::UpstreamFailure);
    assert_eq!(error.message(), "invalid x-api-key");
}

#[rstest]
#[tokio::test]
async fn connection_test_uses_text_instruction(configured: Options) {
    let mut llm = MockLlmClient::new();
    llm.expect_complete()
        .withf(|req| {
            req.system == Language::Text.system_prompt()
                && req.messages == vec![ChatTurn::user(CONNECTION_PROBE)]
        })
        .return_once(|_| {
            Ok(Completion {
                text: "Connection successful".to_owned(),
            })
        });
    let mut history = MockHistoryRepository::new();
    history.expect_insert().never();
    let service = make_service(llm, history, configured);

    let reply = service.test_connection().await.expect("connection test succeeds");
    assert_eq!(reply, "Connection successful");
}
