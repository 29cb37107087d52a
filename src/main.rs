use anyhow::Result;

fn main() -> Result<()> {
    shell_history_ingest::cli::run()
}
