use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::Context;
use crate::error::Result;
use crate::webhook::{handle, GROUP_ID_LOG};

pub fn run(ctx: &Context, file: Option<PathBuf>) -> Result<()> {
    let body = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let log_path = Path::new(&ctx.settings.data_dir).join(GROUP_ID_LOG);
    let ack = handle(&body, &log_path, chrono::Local::now().naive_local())?;
    println!("{ack}");
    Ok(())
}
