//! End-to-end navigation tests: loader, navigator and statistics wired
//! over in-memory ports.

use std::sync::Arc;

use branchwise_core::error::DomainError;
use branchwise_scenario::application::loader::GraphLoader;
use branchwise_scenario::application::navigator::Navigator;
use branchwise_scenario::application::progress_store::{PROGRESS_KEY, ProgressStore};
use branchwise_scenario::application::statistics::StrategyStatistics;
use branchwise_scenario::domain::graph::START_NODE_ID;
use branchwise_test_support::{FixedClock, InMemoryStore, StaticContentSource};
use serde_json::json;

/// A small branching scenario with gating on both previous and forbidden
/// choices and two distinct endings.
fn difficult_conversation() -> serde_json::Value {
    json!({
        "id": "difficult-conversation",
        "metadata": {
            "title": "A Difficult Conversation",
            "description": "Your teammate has been missing stand-ups.",
            "category": "workplace",
            "difficulty": "intermediate",
            "estimatedTime": "10 minutes"
        },
        "characters": {
            "sam": { "name": "Sam", "role": "Teammate", "portrait": "sam.png" }
        },
        "nodes": {
            "start": {
                "type": "scene",
                "content": { "title": "Monday", "text": "Sam missed another stand-up.", "speaker": "narrator" },
                "choices": [
                    { "id": "ask", "text": "Ask how Sam is doing", "strategy": "active_listening", "nextNode": "listen" },
                    { "id": "confront", "text": "Point out the pattern", "strategy": "competing", "nextNode": "tension" }
                ]
            },
            "listen": {
                "type": "scene",
                "content": { "text": "Sam admits to feeling overwhelmed.", "speaker": "sam" },
                "feedback": {
                    "strategy": "active_listening",
                    "effectiveness": "high",
                    "explanation": "Opening with curiosity lowers defensiveness.",
                    "skillsUsed": ["empathy", "open questions"]
                },
                "choices": [
                    { "id": "plan", "text": "Make a plan together", "strategy": "collaborating", "nextNode": "good-ending" },
                    { "id": "escalate", "text": "Escalate to the manager", "strategy": "competing", "nextNode": "tension",
                      "requirements": { "previousChoices": ["confront"] } }
                ]
            },
            "tension": {
                "type": "scene",
                "content": { "text": "Sam crosses their arms." },
                "choices": [
                    { "id": "soften", "text": "Soften your tone", "strategy": "accommodating", "nextNode": "listen" },
                    { "id": "drop", "text": "Drop it", "strategy": "avoiding", "nextNode": "flat-ending",
                      "requirements": { "forbiddenChoices": ["soften"] } }
                ]
            },
            "good-ending": { "type": "resolution", "content": { "text": "You agree on a plan." } },
            "flat-ending": { "type": "resolution", "content": { "text": "Nothing changes." } }
        }
    })
}

struct Harness {
    navigator: Navigator,
    store: Arc<InMemoryStore>,
}

fn harness() -> Harness {
    let content = Arc::new(
        StaticContentSource::new()
            .with_json("difficult-conversation.json", &difficult_conversation()),
    );
    let store = Arc::new(InMemoryStore::new());
    let progress = ProgressStore::new(store.clone());
    let statistics = Arc::new(StrategyStatistics::new(progress.clone()));
    let navigator = Navigator::new(
        GraphLoader::new(content),
        progress,
        statistics,
        Arc::new(FixedClock::default()),
    );
    Harness { navigator, store }
}

fn available_ids(navigator: &Navigator) -> Vec<String> {
    navigator
        .available_choices()
        .unwrap()
        .into_iter()
        .map(|c| c.id.clone())
        .collect()
}

#[tokio::test]
async fn test_walking_forward_then_back_the_same_number_of_times_returns_to_start() {
    // Arrange
    let Harness { mut navigator, .. } = harness();
    navigator
        .load_scenario("difficult-conversation")
        .await
        .unwrap();

    // Act: always take the last available choice until the scenario ends.
    let mut steps = 0;
    while !navigator.is_complete().unwrap() {
        let choice_id = available_ids(&navigator).pop().unwrap();
        navigator.advance(&choice_id).await.unwrap();
        steps += 1;
    }
    for _ in 0..steps {
        navigator.go_back().await.unwrap();
    }

    // Assert
    let session = navigator.active().unwrap();
    assert!(steps > 0);
    assert_eq!(session.current_node_id(), START_NODE_ID);
    assert!(session.history().is_empty());
    assert!(matches!(
        navigator.go_back().await,
        Err(DomainError::NoHistory)
    ));
}

#[tokio::test]
async fn test_gating_follows_choices_made_anywhere_in_history() {
    let Harness { mut navigator, .. } = harness();
    navigator
        .load_scenario("difficult-conversation")
        .await
        .unwrap();

    navigator.advance("confront").await.unwrap();
    assert_eq!(available_ids(&navigator), vec!["soften", "drop"]);

    navigator.advance("soften").await.unwrap();
    assert_eq!(available_ids(&navigator), vec!["plan", "escalate"]);

    navigator.restart().await.unwrap();
    navigator.advance("ask").await.unwrap();
    assert_eq!(available_ids(&navigator), vec!["plan"]);
}

#[tokio::test]
async fn test_forbidden_choice_is_rejected_with_not_available() {
    // Arrange
    let Harness { mut navigator, .. } = harness();
    navigator
        .load_scenario("difficult-conversation")
        .await
        .unwrap();
    navigator.advance("ask").await.unwrap();
    navigator.go_back().await.unwrap();
    navigator.advance("confront").await.unwrap();
    navigator.advance("soften").await.unwrap();
    navigator.advance("escalate").await.unwrap();
    let history_before = navigator.history().unwrap();

    // Act
    let result = navigator.advance("drop").await;

    // Assert
    assert!(matches!(result, Err(DomainError::ChoiceNotAvailable { .. })));
    assert_eq!(navigator.history().unwrap(), history_before);
}

#[tokio::test]
async fn test_statistics_accumulate_across_sessions() {
    // Arrange
    let Harness {
        mut navigator,
        store,
    } = harness();
    navigator
        .load_scenario("difficult-conversation")
        .await
        .unwrap();

    // Act
    navigator.advance("ask").await.unwrap();
    navigator.advance("plan").await.unwrap();
    navigator.restart().await.unwrap();
    navigator.advance("ask").await.unwrap();
    navigator.advance("plan").await.unwrap();

    // Assert
    let stored = store.value(PROGRESS_KEY).unwrap();
    assert_eq!(stored["statistics"]["totalChoicesMade"], 4);
    assert_eq!(stored["statistics"]["strategiesUsed"]["active_listening"], 2);
    assert_eq!(stored["statistics"]["strategiesUsed"]["collaborating"], 2);
    assert_eq!(stored["statistics"]["scenariosCompleted"], 1);
    assert_eq!(
        stored["completedScenarios"],
        json!(["difficult-conversation"])
    );
    assert_eq!(stored["userProgress"]["currentNode"], "good-ending");
}

#[tokio::test]
async fn test_terminal_node_still_allows_going_back_to_explore() {
    let Harness { mut navigator, .. } = harness();
    navigator
        .load_scenario("difficult-conversation")
        .await
        .unwrap();
    navigator.advance("confront").await.unwrap();
    navigator.advance("drop").await.unwrap();
    assert!(navigator.is_complete().unwrap());

    let transition = navigator.go_back().await.unwrap();

    assert_eq!(transition.node_id, "tension");
    assert!(!navigator.is_complete().unwrap());
    assert_eq!(transition.node.content.text, "Sam crosses their arms.");
}

#[tokio::test]
async fn test_feedback_travels_with_the_arrival_node() {
    let Harness { mut navigator, .. } = harness();
    navigator
        .load_scenario("difficult-conversation")
        .await
        .unwrap();

    let transition = navigator.advance("ask").await.unwrap();

    let feedback = transition.node.feedback.unwrap();
    assert_eq!(feedback.effectiveness.as_deref(), Some("high"));
    assert_eq!(feedback.skills_used, vec!["empathy", "open questions"]);
}
