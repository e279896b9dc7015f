use colored::Colorize;

use crate::cli::Context;
use crate::error::{AppError, Result};
use crate::line::{LineClient, LineConfig};

pub fn run(ctx: &Context) -> Result<()> {
    let Some(token) = ctx.settings.channel_access_token.clone().filter(|t| !t.is_empty()) else {
        return Err(AppError::Settings("access token not configured".into()));
    };
    let config = LineConfig {
        token,
        recipient: ctx.settings.group_id.clone().unwrap_or_default(),
        api_base: ctx.settings.api_base.clone(),
    };
    let info = LineClient::new(config)?.bot_info()?;
    println!("{}", "✅ API接続成功！".green().bold());
    println!();
    println!("Bot名: {}", info.display_name);
    println!("Bot ID: {}", info.user_id);
    Ok(())
}
