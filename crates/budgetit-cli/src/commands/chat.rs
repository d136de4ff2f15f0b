//! Budget assistant chat command

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use budgetit_core::{
    chat::{ChatBackend, SUGGESTED_QUESTIONS},
    ChatClient, ChatMessage, ChatSession, Error, Sender,
};

fn print_message(message: &ChatMessage) {
    match message.sender {
        Sender::Bot => println!("🤖 {}", message.text),
        Sender::User => println!("🙂 {}", message.text),
    }
}

fn print_suggestions() {
    println!("💡 Try asking:");
    for (i, question) in SUGGESTED_QUESTIONS.iter().enumerate() {
        println!("   /{} {}", i + 1, question);
    }
}

/// Map `/1`..`/4` to the matching suggested question
fn suggestion(input: &str) -> Option<&'static str> {
    let index: usize = input.strip_prefix('/')?.parse().ok()?;
    SUGGESTED_QUESTIONS.get(index.checked_sub(1)?).copied()
}

pub async fn cmd_chat(message: Option<&str>) -> Result<()> {
    let Some(client) = ChatClient::from_env() else {
        bail!(
            "No chat backend configured. Set GEMINI_API_KEY (or CHAT_BACKEND=ollama with \
             OLLAMA_HOST, or CHAT_BACKEND=mock)."
        );
    };
    tracing::debug!(model = %client.model(), host = %client.host(), "Chat backend selected");

    let chat = ChatSession::new(client);

    match message {
        Some(text) => {
            if let Some(reply) = chat.send(text).await? {
                print_message(&reply);
            }
            Ok(())
        }
        None => run_chat_loop(&chat, io::stdin().lock()).await,
    }
}

/// Interactive conversation until `/quit` or end of input
pub async fn run_chat_loop<R: BufRead>(chat: &ChatSession, mut input: R) -> Result<()> {
    for message in chat.messages() {
        print_message(&message);
    }
    print_suggestions();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        let text = match line {
            "/quit" | "/exit" => break,
            "/suggest" => {
                print_suggestions();
                continue;
            }
            _ => suggestion(line).unwrap_or(line),
        };

        match chat.send(text).await {
            Ok(Some(reply)) => print_message(&reply),
            Ok(None) => {}
            Err(Error::ChatBusy) => println!("⏳ Still thinking about your last question..."),
            Err(e) => return Err(e.into()),
        }
    }

    println!("👋 Happy budgeting!");
    Ok(())
}
