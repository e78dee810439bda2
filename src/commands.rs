use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::agent::{format_price, NewsAgent, GUIDANCE};

/// Companies shown by /stocks before the listing is cut off
const STOCKS_LISTED_LIMIT: usize = 30;

#[derive(BotCommands, Clone, Debug)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "display this text.")]
    Help,
    #[command(description = "news digest for a company - use '/news Газпром' or just send a message.")]
    News(String),
    #[command(description = "current price for a company - use '/price SBER'.")]
    Price(String),
    #[command(description = "list companies the bot knows about.")]
    Stocks,
}

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    agent: Arc<NewsAgent>,
) -> ResponseResult<()> {
    // Log incoming message details
    let chat_type = match msg.chat.is_private() {
        true => "Private",
        false => match msg.chat.is_group() {
            true => "Group",
            false => match msg.chat.is_supergroup() {
                true => "Supergroup",
                false => "Channel",
            },
        },
    };

    let username = msg
        .from
        .as_ref()
        .and_then(|user| user.username.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("<no_username>");
    let message_text = msg.text().unwrap_or("<no_text>");

    info!(
        "📨 Received message in {} chat (ID: {}) from @{}: '{}'",
        chat_type, msg.chat.id, username, message_text
    );
    info!("💬 Processing command: {cmd:?}");

    match cmd {
        Command::Help => {
            let response = Command::descriptions().to_string();
            info!("📤 Sending help response to chat {}", msg.chat.id);
            bot.send_message(msg.chat.id, response).await?
        }
        Command::News(query) => {
            if query.trim().is_empty() {
                let response =
                    "Напишите, про какую компанию нужны новости. Например: /news Газпром";
                info!("📤 Sending empty news command help to chat {}", msg.chat.id);
                bot.send_message(msg.chat.id, response).await?
            } else {
                info!(
                    "📰 Processing news query from chat {}: '{}'",
                    msg.chat.id, query
                );
                bot.send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
                    .await?;

                let response = agent.run(&query);
                info!(
                    "📤 Sending digest to chat {} (length: {} chars)",
                    msg.chat.id,
                    response.len()
                );
                bot.send_message(msg.chat.id, response).await?
            }
        }
        Command::Price(query) => {
            if query.trim().is_empty() {
                let response = "Укажите компанию или тикер. Например: /price SBER";
                info!("📤 Sending empty price command help to chat {}", msg.chat.id);
                bot.send_message(msg.chat.id, response).await?
            } else {
                info!(
                    "📈 Processing price request from chat {}: '{}'",
                    msg.chat.id, query
                );

                let quote = agent
                    .resolve_ticker(&query)
                    .and_then(|ticker| agent.catalog().by_ticker(&ticker).cloned());

                let response = match quote {
                    Some(security) => {
                        info!(
                            "📤 Sending quote to chat {} for {}: {:.2}",
                            msg.chat.id, security.ticker, security.price
                        );
                        format_price(&security)
                    }
                    None => {
                        info!("📤 No company resolved for chat {}", msg.chat.id);
                        GUIDANCE.to_string()
                    }
                };
                bot.send_message(msg.chat.id, response).await?
            }
        }
        Command::Stocks => {
            let catalog = agent.catalog();
            let mut response = format!("📋 Известные компании ({}):\n\n", catalog.len());
            for security in catalog.securities().iter().take(STOCKS_LISTED_LIMIT) {
                response.push_str(&format!("{} — {}\n", security.ticker, security.name));
            }
            if catalog.len() > STOCKS_LISTED_LIMIT {
                response.push_str(&format!(
                    "\n…и ещё {}. Спросите про любую из них.",
                    catalog.len() - STOCKS_LISTED_LIMIT
                ));
            }
            info!(
                "📤 Sending catalog listing to chat {}: {} companies",
                msg.chat.id,
                catalog.len()
            );
            bot.send_message(msg.chat.id, response).await?
        }
    };

    Ok(())
}
