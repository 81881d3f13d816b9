use anyhow::Result;

fn main() -> Result<()> {
    whatsapper::cli::run()
}
