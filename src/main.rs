use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_tessera::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment; a missing .env is fine.
    dotenvy::dotenv().ok();
    let options = ShellOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_spec())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    // Serve the command shell over stdio.
    let mut shell = Shell::new(options)?;
    if let Err(e) = shell.run(std::io::stdin().lock(), std::io::stdout().lock()) {
        log::error!("fatal error: {}", e);
        return Err(e);
    }
    Ok(())
}
