use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::agent::NewsAgent;
use crate::commands::{answer, Command};

pub async fn handle_message(bot: Bot, msg: Message, agent: Arc<NewsAgent>) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        // Get bot info to use the correct username for command parsing
        let bot_user = bot.get_me().await?;
        let bot_username = bot_user.username.as_deref().unwrap_or("bot");

        info!("📝 Processing message: '{text}' with bot username: @{bot_username}");

        // Check if bot is mentioned in the message
        let bot_mention = format!("@{bot_username}");
        let is_private_chat = msg.chat.is_private();
        let is_mentioned = text.contains(&bot_mention);

        info!(
            "💬 Chat type: {}, Bot mentioned: {}",
            if is_private_chat { "Private" } else { "Group" },
            is_mentioned
        );

        // Process message if it's a private chat OR bot is mentioned in group
        if is_private_chat || is_mentioned {
            let processed_text = if is_mentioned {
                // Remove bot mention and clean up the text
                let cleaned = text.replace(&bot_mention, "").trim().to_string();
                info!("🧽 Cleaned text after removing mention: '{cleaned}'");
                cleaned
            } else {
                text.to_string()
            };

            // Try to parse as command first
            if let Ok(cmd) = Command::parse(&processed_text, "") {
                info!("✅ Command parsed successfully: {cmd:?}");
                answer(bot, msg, cmd, agent).await?;
            } else if processed_text.starts_with('/') {
                // If it starts with '/' but couldn't parse, it's an unknown command
                info!("❌ Unknown command: '{processed_text}'");
                let response = format!(
                    "Unknown command: {}\n\nAvailable commands:\n{}",
                    processed_text,
                    Command::descriptions()
                );
                bot.send_message(msg.chat.id, response).await?;
            } else if !processed_text.trim().is_empty() {
                // Not a command: treat free text as a news query
                info!("📰 No command detected - routing '{processed_text}' through the query pipeline");
                answer(bot, msg, Command::News(processed_text), agent).await?;
            } else {
                // Empty message after mention removal
                info!("🙄 Empty message after processing mention");
                let response = if is_private_chat {
                    format!(
                        "Привет! Спросите про новости компании, например 'Покажи новости про Газпром'.\n\n{}",
                        Command::descriptions()
                    )
                } else {
                    format!(
                        "Привет! Напишите вопрос после @{}, например 'новости Сбербанк'.\n\n{}",
                        bot_username,
                        Command::descriptions()
                    )
                };
                bot.send_message(msg.chat.id, response).await?;
            }
        } else {
            // In group chat but bot not mentioned - ignore
            info!("😶 Group message without bot mention - ignoring");
        }
    } else {
        info!("📷 Received non-text message");
    }
    Ok(())
}
