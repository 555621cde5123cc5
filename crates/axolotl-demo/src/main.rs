fn main() -> anyhow::Result<()> {
    axolotl_demo::run()
}
