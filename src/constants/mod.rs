pub struct Env {
    pub database_url: String,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub jwks_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

impl Env {
    fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let auth_issuer = std::env::var("AUTH_ISSUER")
            .expect("AUTH_ISSUER must be set in .env file or environment variable");
        let auth_audience = std::env::var("AUTH_AUDIENCE")
            .expect("AUTH_AUDIENCE must be set in .env file or environment variable");
        let jwks_url = std::env::var("JWKS_URL").unwrap_or_else(|_| {
            format!("{}/.well-known/jwks.json", auth_issuer.trim_end_matches('/'))
        });

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        Env {
            database_url,
            auth_issuer,
            auth_audience,
            jwks_url,
            frontend_url,
            ip,
            port,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
