// ABOUTME: Integration tests for the chat session against a scripted provider
// ABOUTME: History shape, sampling defaults, image parts, and the synthetic failure reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::io::Write;

use cook_ai::chat::{ChatSession, ImageAttachment, SamplingParams};
use cook_ai::constants::chat::FAILURE_REPLY;
use cook_ai::errors::AppError;
use cook_ai::llm::{ContentPart, LlmCapabilities, MessageRole};

use common::{init_test_logging, ScriptedLlm};

#[tokio::test]
async fn test_blank_message_without_image_is_ignored() {
    init_test_logging();
    let llm = ScriptedLlm::new(LlmCapabilities::multimodal(), vec![]);
    let mut chat = ChatSession::new(llm.clone());

    assert!(chat.send("   ", None).await.is_none());
    assert!(chat.history().is_empty());
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_reply_is_trimmed_and_history_grows() {
    init_test_logging();
    let llm = ScriptedLlm::new(
        LlmCapabilities::multimodal(),
        vec![Ok("  Try menemen.\n".to_owned()), Ok("Add feta.".to_owned())],
    );
    let mut chat = ChatSession::new(llm.clone());

    let reply = chat.send("I have eggs and tomatoes", None).await.unwrap();
    assert_eq!(reply.text(), "Try menemen.");
    chat.send("Anything else?", None).await.unwrap();

    let history = chat.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[3].text(), "Add feta.");

    let requests = llm.requests();
    let last = &requests[1];
    assert_eq!(last.messages.len(), 4);
    assert_eq!(last.messages[0].role, MessageRole::System);
    assert_eq!(last.temperature, Some(0.7));
    assert_eq!(last.top_p, Some(0.95));
    assert_eq!(last.max_tokens, Some(800));
}

#[tokio::test]
async fn test_failure_appends_synthetic_reply() {
    init_test_logging();
    let llm = ScriptedLlm::new(
        LlmCapabilities::multimodal(),
        vec![
            Err(AppError::external_unavailable("ChatEndpoint", "timeout")),
            Ok("Back online.".to_owned()),
        ],
    );
    let mut chat = ChatSession::new(llm);

    let reply = chat.send("Hello?", None).await.unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.text(), FAILURE_REPLY);

    let reply = chat.send("Still there?", None).await.unwrap();
    assert_eq!(reply.text(), "Back online.");
    assert_eq!(chat.history().len(), 4);
}

#[tokio::test]
async fn test_image_part_precedes_text() {
    init_test_logging();
    let llm = ScriptedLlm::new(
        LlmCapabilities::multimodal(),
        vec![Ok("That is a leek.".to_owned())],
    );
    let mut chat = ChatSession::new(llm.clone());
    let image = ImageAttachment::from_bytes("image/jpeg", vec![1, 2, 3]);

    chat.send("What is this?", Some(image)).await.unwrap();

    let user_turn = &chat.history()[0];
    assert_eq!(
        user_turn.content,
        vec![
            ContentPart::image_url("data:image/jpeg;base64,AQID"),
            ContentPart::text("What is this?"),
        ]
    );
    assert!(llm.requests()[0].has_images());
}

#[tokio::test]
async fn test_image_only_turn_is_sent() {
    init_test_logging();
    let llm = ScriptedLlm::new(LlmCapabilities::multimodal(), vec![Ok("Soup!".to_owned())]);
    let mut chat = ChatSession::new(llm);
    let image = ImageAttachment::from_bytes("image/png", vec![9]);

    let reply = chat.send("", Some(image)).await.unwrap();
    assert_eq!(reply.text(), "Soup!");
    assert_eq!(chat.history()[0].content.len(), 1);
}

#[tokio::test]
async fn test_image_to_text_only_provider_is_rejected_before_sending() {
    init_test_logging();
    let llm = ScriptedLlm::new(LlmCapabilities::text_only(), vec![Ok("unused".to_owned())]);
    let mut chat = ChatSession::new(llm.clone());
    let image = ImageAttachment::from_bytes("image/jpeg", vec![1]);

    let reply = chat.send("Look", Some(image)).await.unwrap();
    assert_eq!(reply.text(), FAILURE_REPLY);
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_custom_sampling_and_image_file() {
    init_test_logging();
    let llm = ScriptedLlm::new(LlmCapabilities::multimodal(), vec![Ok("Nice".to_owned())]);
    let mut chat = ChatSession::new(llm.clone()).with_sampling(SamplingParams {
        model: Some("gpt-4o".to_owned()),
        temperature: 0.2,
        top_p: 0.5,
        max_tokens: 100,
    });

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[1, 2, 3]).unwrap();
    let image = ImageAttachment::from_path(file.path()).await.unwrap();
    assert_eq!(image.mime_type(), "image/png");

    chat.send("Rate my plating", Some(image)).await.unwrap();
    let requests = llm.requests();
    let request = &requests[0];
    assert_eq!(request.model.as_deref(), Some("gpt-4o"));
    assert_eq!(request.max_tokens, Some(100));
}
