// ABOUTME: Chat command: one-shot question or an interactive conversation on stdin
// ABOUTME: Replies are printed as they arrive; failures show the assistant's fallback reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::PathBuf;

use cook_ai::chat::{ChatSession, ImageAttachment};
use cook_ai::config::ChatConfig;
use cook_ai::context::chat_session;
use cook_ai::errors::AppResult;
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// Ask once when `text` or `image` is given, otherwise read turns from stdin
pub async fn run(config: &ChatConfig, image: Option<PathBuf>, text: &str) -> AppResult<()> {
    let mut session = chat_session(config)?;
    let image = match image {
        Some(path) => Some(ImageAttachment::from_path(&path).await?),
        None => None,
    };

    if !text.trim().is_empty() || image.is_some() {
        ask(&mut session, text, image).await;
        return Ok(());
    }

    println!("Ask the cooking assistant anything. Send an empty line to quit.");
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            break;
        }
        ask(&mut session, &line, None).await;
    }
    Ok(())
}

async fn ask(session: &mut ChatSession, text: &str, image: Option<ImageAttachment>) {
    if let Some(reply) = session.send(text, image).await {
        println!("\n{}\n", reply.text());
    }
}
