fn main() -> anyhow::Result<()> {
  bandhub_lib::run()
}
