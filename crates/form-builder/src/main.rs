fn main() -> anyhow::Result<()> {
    form_builder::cli::main()
}
