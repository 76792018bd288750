use super::*;
use crate::core::controller::ResolutionOutcome;
use std::time::Duration;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

fn instant_config() -> Config {
    Config {
        simulate_delay_ms: Some(0),
        ..Config::default()
    }
}

#[test]
fn no_subcommand_defaults_to_chat() {
    let args = parse_args(&["chatdeck"]);
    assert!(args.command.is_none());
    assert!(args.provider.is_none());
    assert!(!args.no_fallback);
}

#[test]
fn global_flags_feed_session_options() {
    let args = parse_args(&["chatdeck", "-p", "nlpcloud", "--no-fallback", "say", "hi"]);
    assert_eq!(args.provider.as_deref(), Some("nlpcloud"));
    assert!(args.no_fallback);

    let options = SessionOptions::from(&args);
    assert_eq!(options.provider.as_deref(), Some("nlpcloud"));
    assert!(options.no_fallback);
    assert!(options.log.is_none());
}

#[test]
fn say_collects_trailing_words() {
    let argv = ["chatdeck", "say", "what", "is", "-rust-"];
    match parse_args(&argv).command {
        Some(Commands::Say { prompt }) => assert_eq!(prompt, vec!["what", "is", "-rust-"]),
        _ => panic!("argv={argv:?} should parse as say"),
    }
}

#[test]
fn set_accepts_missing_key_and_multi_word_values() {
    match parse_args(&["chatdeck", "set"]).command {
        Some(Commands::Set { key, value }) => {
            assert!(key.is_none());
            assert!(value.is_empty());
        }
        _ => panic!("expected set"),
    }

    match parse_args(&["chatdeck", "set", "huggingface-url", "http://localhost:9", "x"]).command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key.as_deref(), Some("huggingface-url"));
            assert_eq!(value, vec!["http://localhost:9", "x"]);
        }
        _ => panic!("expected set"),
    }
}

#[test]
fn unset_requires_key() {
    assert!(Args::try_parse_from(["chatdeck", "unset"]).is_err());
}

#[test]
fn build_session_rejects_unknown_provider() {
    let config = Config {
        provider: Some("openai".to_string()),
        ..instant_config()
    };
    let err = build_session(&config, SessionOptions::default())
        .err()
        .expect("unknown provider should fail");
    assert!(err.to_string().contains("openai"));

    let options = SessionOptions {
        provider: Some("bogus".to_string()),
        ..SessionOptions::default()
    };
    assert!(build_session(&instant_config(), options).is_err());
}

#[test]
fn command_line_provider_overrides_config() {
    let config = Config {
        provider: Some("simulate".to_string()),
        ..instant_config()
    };
    let options = SessionOptions {
        provider: Some("huggingface".to_string()),
        no_fallback: true,
        ..SessionOptions::default()
    };
    let session = build_session(&config, options).unwrap();
    assert_eq!(
        session.controller().provider_kind(),
        ProviderKind::HuggingFace
    );
    assert!(!session.settings().fallback_on_failure);
    assert_eq!(session.controller().store().len(), 1);
}

#[tokio::test]
async fn built_session_answers_with_simulator() {
    let mut session = build_session(&instant_config(), SessionOptions::default()).unwrap();
    let request = session.submit("hello").unwrap();
    let (request_id, result) = request.run().await;
    let outcome = session.controller_mut().apply_resolution(request_id, result);

    assert!(matches!(
        outcome,
        ResolutionOutcome::Replied { advisory: false, .. }
    ));
    assert_eq!(session.controller().active_messages().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_remote_reply_is_not_cut_off() {
    use crate::core::config::RemoteConfig;
    use crate::utils::test_utils::StubServer;

    let server = StubServer::respond_after(
        Duration::from_secs(180),
        200,
        r#"[{"generated_text":"worth the wait"}]"#,
    )
    .await;
    let config = Config {
        provider: Some("huggingface".to_string()),
        huggingface: RemoteConfig {
            api_key: Some("hf_test".to_string()),
            url: Some(server.url("/")),
        },
        ..instant_config()
    };
    let options = SessionOptions {
        no_fallback: true,
        ..SessionOptions::default()
    };
    let mut session = build_session(&config, options).unwrap();

    let request = session.submit("hello").unwrap();
    let (request_id, result) = request.run().await;
    let outcome = session.controller_mut().apply_resolution(request_id, result);

    assert!(matches!(
        outcome,
        ResolutionOutcome::Replied { advisory: false, .. }
    ));
    assert_eq!(
        session.controller().active_messages()[1].content,
        "worth the wait"
    );
    server.captured().await;
}
