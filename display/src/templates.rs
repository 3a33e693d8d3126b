use tera::Tera;

lazy_static::lazy_static! {
    pub static ref TEMPLATES: Tera = {
        // Anchored to the crate so the glob resolves for both the binary
        // and the test harness
        match Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html")) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("Template parsing error: {}", e);
                std::process::exit(1);
            }
        }
    };
}
