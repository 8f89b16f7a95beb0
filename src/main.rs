fn main() -> anyhow::Result<()> {
    watchtrail_lib::run()
}
