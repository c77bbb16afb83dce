use loadpulse::error::AppResult;

fn main() -> AppResult<()> {
    loadpulse::entry::run()
}
