fn main() -> anyhow::Result<()> {
    a3lib::cli::run_cli()
}
