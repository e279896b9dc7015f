use comfy_table::{Cell, Table};
use zeroize::Zeroize;

use crate::cli::Context;
use crate::error::Result;
use crate::settings::{save_settings, shellexpand_path, try_load_settings, validate_recipient, Settings};

/// Configuration status in the same wording as the in-sheet check dialog.
pub fn format_settings_check(settings: &Settings) -> String {
    let mut message = String::from("=== 現在の設定 ===\n\n");

    match settings.token_preview() {
        Some(preview) => {
            message += "✅ アクセストークン: 設定済み\n";
            message += &format!("   ({preview})\n\n");
        }
        None => message += "❌ アクセストークン: 未設定\n\n",
    }

    let group_id = settings.group_id.as_deref().filter(|g| !g.is_empty());
    match group_id {
        Some(id) => {
            message += "✅ グループID: 設定済み\n";
            message += &format!("   ({id})\n");
        }
        None => message += "❌ グループID: 未設定\n",
    }

    if settings.token_preview().is_none() || group_id.is_none() {
        message += "\n⚠️ 初期設定を完了してください";
    }
    message
}

pub fn show(ctx: &Context) -> Result<()> {
    let s = &ctx.settings;
    println!("{}", format_settings_check(s));
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("Settings file"), Cell::new(ctx.settings_path.display())]);
    table.add_row(vec![
        Cell::new("Workbook"),
        Cell::new(s.workbook.as_deref().unwrap_or("(not set)")),
    ]);
    table.add_row(vec![Cell::new("PL sheet"), Cell::new(&s.pl_sheet)]);
    table.add_row(vec![
        Cell::new("User name"),
        Cell::new(if s.user_name.is_empty() { "(not set)" } else { &s.user_name }),
    ]);
    table.add_row(vec![Cell::new("API base"), Cell::new(&s.api_base)]);
    table.add_row(vec![Cell::new("Data dir"), Cell::new(&s.data_dir)]);
    println!("{table}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn set(
    ctx: &Context,
    token: Option<String>,
    prompt_token: bool,
    group_id: Option<String>,
    workbook_path: Option<String>,
    pl_sheet: Option<String>,
    user_name: Option<String>,
    api_base: Option<String>,
    data_dir: Option<String>,
) -> Result<()> {
    // start from the file as stored so a corrupt file is reported, not overwritten
    let mut settings = try_load_settings(&ctx.settings_path)?;

    let mut token = token;
    if prompt_token {
        token = Some(rpassword::prompt_password("Channel access token: ")?);
    }
    if let Some(mut t) = token {
        settings.channel_access_token = Some(t.trim().to_string());
        t.zeroize();
    }
    if let Some(id) = group_id {
        validate_recipient(&id)?;
        settings.group_id = Some(id);
    }
    if let Some(path) = workbook_path {
        settings.workbook = Some(shellexpand_path(&path));
    }
    if let Some(sheet) = pl_sheet {
        settings.pl_sheet = sheet;
    }
    if let Some(name) = user_name {
        settings.user_name = name;
    }
    if let Some(base) = api_base {
        settings.api_base = base;
    }
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    save_settings(&ctx.settings_path, &settings)?;
    println!("設定を保存しました ({})", ctx.settings_path.display());

    if let Some(mut t) = settings.channel_access_token.take() {
        t.zeroize();
    }
    Ok(())
}
