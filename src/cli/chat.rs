//! Interactive and one-shot chat command handler.

use std::io::{BufRead, Write};

use crate::auth::{CredentialStore, DeviceAuthorizationClient, SessionGuard};
use crate::chat::{Conversation, ConversationStore, GeminiClient};
use crate::cli::ChatArgs;
use crate::config::ZyraConfig;
use crate::error::{Result, ZyraError};

/// Handle `zyra chat`.
pub async fn handle_chat(config: &ZyraConfig, args: ChatArgs) -> Result<()> {
    let store = CredentialStore::new(config.credentials_path());
    let auth_client =
        DeviceAuthorizationClient::new(config.server_url.clone(), config.client_id.clone());
    SessionGuard::new(&store, &auth_client)
        .require_authenticated()
        .await?;

    let api_key = config.google_api_key.clone().ok_or_else(|| {
        ZyraError::Configuration("GOOGLE_API_KEY is not set in the environment".to_string())
    })?;
    let model = args.model.unwrap_or_else(|| config.model.clone());
    let gemini = GeminiClient::new(api_key, model);

    let conversations = ConversationStore::new(config.conversations_dir());
    let mut conversation = conversations.get_or_create(args.conversation)?;

    println!("Conversation: {} ({})", conversation.title, conversation.id);
    for message in &conversation.messages {
        let speaker = match message.role {
            crate::chat::ChatRole::User => "you",
            crate::chat::ChatRole::Assistant => "assistant",
        };
        println!("[{speaker}] {}", message.content);
    }

    if let Some(prompt) = args.prompt {
        exchange(&gemini, &conversations, &mut conversation, &prompt).await?;
        return Ok(());
    }

    println!("Type a message and press Enter. Type \"exit\" to end the conversation.\n");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("Chat session ended. Goodbye!");
            break;
        }
        exchange(&gemini, &conversations, &mut conversation, input).await?;
    }
    Ok(())
}

/// One user turn: persist the prompt, stream the reply, persist the reply.
async fn exchange(
    gemini: &GeminiClient,
    conversations: &ConversationStore,
    conversation: &mut Conversation,
    prompt: &str,
) -> Result<()> {
    conversations.append_user_message(conversation, prompt)?;

    let reply = gemini
        .reply(&conversation.messages, |chunk| {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!();

    conversations.append_assistant_message(conversation, reply)?;
    Ok(())
}
