#[actix_web::main]
async fn main() -> std::io::Result<()> {
    club_organigram::run().await
}
