#[cfg(test)]
mod tests {
    use crate::llm::LLMError;
    use crate::llm::mock::MockLLMProvider;
    use crate::pipeline::{PipelineConfig, PipelineError, PipelineRunner, RunState};
    use crate::preferences::PreferenceInput;
    use crate::stages::StageKind;
    use tempfile::TempDir;

    const PARSED: &str = "[{'dietary': 'Vegetarian', 'cuisine': 'Italian', 'time': '<30min', \
                          'ingredients_to_use': ['pasta', 'spinach'], 'ingredients_to_avoid': []}]";
    const IDEAS: &str = "[{'name': 'Speedy Spinach Pasta', 'description': 'Quick.', 'tags': ['Vegetarian']}]";
    const DETAIL: &str = "Meal Suggestion: Speedy Spinach Pasta\nIngredients:\n- 400g pasta\n\
                          Instructions:\n1. Boil the pasta.";

    fn setup() -> (TempDir, PipelineConfig) {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            history_path: dir.path().join("meal_history.txt"),
            ..PipelineConfig::default()
        };
        (dir, config)
    }

    fn vegetarian_pasta() -> PreferenceInput {
        PreferenceInput::from_raw("Vegetarian", "Italian", "<30min", "pasta, spinach", "")
    }

    #[tokio::test]
    async fn test_successful_run() {
        let (_dir, config) = setup();
        let provider = MockLLMProvider::scripted([PARSED, IDEAS, DETAIL]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(outcome.attempts, 1);
        assert!(!outcome.exhausted);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.meal_name, "Speedy Spinach Pasta");
        assert_eq!(outcome.output(StageKind::ParsePreferences), PARSED);
        assert_eq!(outcome.suggestion(), DETAIL);
        assert_eq!(
            outcome.transitions,
            vec![
                RunState::Idle,
                RunState::Stage0Running,
                RunState::Stage1Running,
                RunState::Stage2Running,
                RunState::Done,
            ]
        );
        assert_eq!(runner.history().read_all().await, vec!["Speedy Spinach Pasta"]);
    }

    #[tokio::test]
    async fn test_each_stage_receives_previous_output() {
        let (_dir, config) = setup();
        let provider = MockLLMProvider::scripted([PARSED, IDEAS, DETAIL]);
        let runner = PipelineRunner::new(&provider, &config);

        runner.run(vegetarian_pasta()).await.unwrap();

        let prompts = provider.prompts();
        assert!(prompts[0].contains(r#""ingredients_to_use":["pasta","spinach"]"#));
        assert!(prompts[1].contains(PARSED));
        assert!(prompts[2].contains(IDEAS));
        assert!(!prompts[2].contains(PARSED));
    }

    #[tokio::test]
    async fn test_empty_preferences_still_run_all_stages() {
        let (_dir, config) = setup();
        let provider = MockLLMProvider::scripted([PARSED, IDEAS, DETAIL]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(PreferenceInput::from_raw("", "", "", "", "")).await.unwrap();

        assert_eq!(provider.call_count(), 3);
        assert!(!outcome.preferences_unresolved());
        assert!(provider.prompts()[0].contains(r#""dietary":"""#));
    }

    #[tokio::test]
    async fn test_invalid_output_retries_whole_chain() {
        let (_dir, config) = setup();
        let provider = MockLLMProvider::scripted([
            PARSED,
            "  [] ",
            "Meal Suggestion: Never Recorded",
            PARSED,
            IDEAS,
            DETAIL,
        ]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        assert_eq!(provider.call_count(), 6);
        assert_eq!(outcome.attempts, 2);
        assert!(!outcome.exhausted);
        assert!(outcome.transitions.contains(&RunState::Retrying { attempt: 2 }));
        assert_eq!(outcome.output(StageKind::Brainstorm), IDEAS);
        assert_eq!(runner.history().read_all().await, vec!["Speedy Spinach Pasta"]);
    }

    #[tokio::test]
    async fn test_attempts_are_capped() {
        let (_dir, config) = setup();
        let provider = MockLLMProvider::new().with_default_response(Some("   "));
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        assert_eq!(provider.call_count(), 9);
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.exhausted);
        assert!(outcome.preferences_unresolved());
        assert_eq!(outcome.warnings.len(), 3);
        assert!(matches!(
            outcome.warnings[0],
            PipelineError::InvalidStageOutput { stage: StageKind::ParsePreferences, attempts: 3 }
        ));
        // Blank suggestions are not remembered
        assert!(runner.history().read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_last_attempt_accepted_when_exhausted() {
        let (_dir, mut config) = setup();
        config.max_attempts = 1;
        let provider = MockLLMProvider::scripted(["", IDEAS, "Try some soup."]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        assert_eq!(provider.call_count(), 3);
        assert!(outcome.exhausted);
        assert!(outcome.preferences_unresolved());
        assert_eq!(outcome.meal_name, "Try some soup.");
        assert!(!outcome.transitions.iter().any(|s| matches!(s, RunState::Retrying { .. })));
    }

    #[tokio::test]
    async fn test_completion_failure_aborts_without_history_update() {
        let (_dir, config) = setup();
        std::fs::write(&config.history_path, "Tacos\n").unwrap();

        let provider = MockLLMProvider::new();
        provider.push_response(PARSED);
        provider.push_error(LLMError::network("connection refused"));
        let runner = PipelineRunner::new(&provider, &config);

        let err = runner.run(vegetarian_pasta()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::CompletionFailed { stage: StageKind::Brainstorm, .. }
        ));
        assert!(err.is_fatal());
        assert_eq!(provider.call_count(), 2);
        assert_eq!(std::fs::read_to_string(&config.history_path).unwrap(), "Tacos\n");
    }

    #[tokio::test]
    async fn test_history_at_capacity_drops_oldest() {
        let (_dir, config) = setup();
        std::fs::write(&config.history_path, "Tacos\nRisotto\nRamen\nPaella\nCurry\n").unwrap();

        let provider = MockLLMProvider::scripted([PARSED, IDEAS, DETAIL]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        let brainstorm_prompt = &provider.prompts()[1];
        assert!(brainstorm_prompt.contains("Tacos, Risotto, Ramen, Paella, Curry"));
        assert!(!provider.prompts()[0].contains("Tacos"));

        let raw = std::fs::read_to_string(&config.history_path).unwrap();
        assert_eq!(raw.lines().count(), 5);
        assert_eq!(
            outcome.history,
            vec!["Risotto", "Ramen", "Paella", "Curry", "Speedy Spinach Pasta"]
        );
    }

    #[tokio::test]
    async fn test_persistence_failure_is_a_warning() {
        let (dir, mut config) = setup();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        config.history_path = blocker.join("meal_history.txt");

        let provider = MockLLMProvider::scripted([PARSED, IDEAS, DETAIL]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        assert_eq!(outcome.suggestion(), DETAIL);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(outcome.warnings[0], PipelineError::PersistenceFailed(_)));
        assert!(!outcome.warnings[0].is_fatal());
    }

    #[tokio::test]
    async fn test_name_falls_back_to_whole_suggestion() {
        let (_dir, config) = setup();
        let provider = MockLLMProvider::scripted([PARSED, IDEAS, "\n  Lemon Herb Salmon  \n"]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();
        assert_eq!(outcome.meal_name, "Lemon Herb Salmon");
    }

    #[tokio::test]
    async fn test_meal_name_matches_history_entry() {
        let (_dir, config) = setup();
        let provider =
            MockLLMProvider::scripted([PARSED, IDEAS, "Roast chicken\n\n  with lemon\tand thyme"]);
        let runner = PipelineRunner::new(&provider, &config);

        let outcome = runner.run(vegetarian_pasta()).await.unwrap();

        assert_eq!(outcome.meal_name, "Roast chicken with lemon and thyme");
        assert_eq!(outcome.history, vec![outcome.meal_name.clone()]);
        assert_eq!(runner.history().read_all().await, vec![outcome.meal_name.clone()]);
    }

    #[tokio::test]
    async fn test_generation_options_come_from_config() {
        let (_dir, mut config) = setup();
        config.temperature = 0.1;
        config.max_tokens = Some(256);
        let provider = MockLLMProvider::scripted([PARSED, IDEAS, DETAIL]);
        let runner = PipelineRunner::new(&provider, &config);

        runner.run(vegetarian_pasta()).await.unwrap();

        for options in provider.options() {
            assert_eq!(options.temperature, Some(0.1));
            assert_eq!(options.max_tokens, Some(256));
        }
    }
}
