fn main() -> anyhow::Result<()> {
    logbeat::app::main()
}
