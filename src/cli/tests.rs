use super::*;
use crate::core::chat_stream::{CompletionClient, FragmentStream};
use crate::core::message::Message;
use async_trait::async_trait;

struct NoopClient;

#[async_trait]
impl CompletionClient for NoopClient {
    async fn stream_completion(
        &self,
        _system_prompt: &str,
        _model: &str,
        _history: &[Message],
    ) -> Option<FragmentStream> {
        None
    }
}

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["stephen-wolf"]);
    assert!(args.command.is_none());
    assert!(args.persona.is_none());
    assert!(args.model.is_none());
}

#[test]
fn global_flags_parse_after_subcommand() {
    let argv = [
        "stephen-wolf",
        "chat",
        "--persona",
        "Historian",
        "-m",
        "Gemma 2 9B",
        "--log",
        "wolf.log",
        "--base-url",
        "http://localhost:9000/v1",
    ];
    let args = parse_args(&argv);

    assert_eq!(args.command, Some(Commands::Chat));
    assert_eq!(args.persona.as_deref(), Some("Historian"));
    assert_eq!(args.model.as_deref(), Some("Gemma 2 9B"));
    assert_eq!(args.log, Some(PathBuf::from("wolf.log")));
    assert_eq!(args.base_url.as_deref(), Some("http://localhost:9000/v1"));
}

#[test]
fn listing_subcommands_parse() {
    assert_eq!(
        parse_args(&["stephen-wolf", "personas"]).command,
        Some(Commands::Personas)
    );
    assert_eq!(
        parse_args(&["stephen-wolf", "models"]).command,
        Some(Commands::Models)
    );
    assert_eq!(
        parse_args(&["stephen-wolf", "deauth"]).command,
        Some(Commands::Deauth)
    );
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Args::try_parse_from(["stephen-wolf", "teleport"]).is_err());
}

#[test]
fn persona_listing_marks_default_and_lists_all() {
    let listing = persona_listing();
    assert!(listing.starts_with("Available personas:\n"));
    assert!(listing.contains("* Mathematician"));
    assert!(listing.contains("  Financial Analyst"));
    assert_eq!(listing.lines().count(), 1 + all_personas().len());
}

#[test]
fn model_listing_shows_backend_ids() {
    let listing = model_listing();
    assert!(listing.contains("* Llama 3.3 70B"));
    assert!(listing.contains("llama-3.3-70b-versatile"));
    assert!(listing.contains("mixtral-8x7b-32768"));
}

#[test]
fn startup_selection_applies_both_flags() {
    let mut controller = ConversationController::new(Arc::new(NoopClient));
    apply_startup_selection(&mut controller, Some("fitness coach"), Some("llama-3.1-8b-instant"))
        .unwrap();

    assert_eq!(controller.session().active_persona().name, "Fitness Coach");
    assert_eq!(controller.session().active_model().display_name, "Llama 3.1 8B");
}

#[test]
fn startup_selection_rejects_unknown_persona() {
    let mut controller = ConversationController::new(Arc::new(NoopClient));
    let err = apply_startup_selection(&mut controller, Some("Wizard"), None).unwrap_err();
    assert!(matches!(err, SelectionError::UnknownPersona { .. }));
}
