use crate::cli::{deliver, Context};
use crate::error::{AppError, Result};
use crate::messages::{format_custom, ja_timestamp, CustomOptions};

pub fn run(
    ctx: &Context,
    title: &str,
    message: &str,
    emoji: Option<String>,
    sender: bool,
    timestamp: bool,
) -> Result<()> {
    let sender = if sender {
        if ctx.settings.user_name.is_empty() {
            return Err(AppError::Settings(
                "--sender needs a user name. Run `plnotify settings set --user-name`".into(),
            ));
        }
        Some(ctx.settings.user_name.clone())
    } else {
        None
    };
    let options = CustomOptions {
        emoji,
        sender,
        timestamp: timestamp.then(|| ja_timestamp(chrono::Local::now().naive_local())),
    };
    let text = format_custom(title, message, &options);
    deliver(ctx, &text, "notification")
}
