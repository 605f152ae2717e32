use sha2::{Digest, Sha256};

/// Deterministic artifact name for an exported dataset:
/// `companies_{dataset}--{short_hash(job_id)}.{extension}`.
pub fn export_filename(dataset: &str, job_id: &str, extension: &str) -> String {
    let hash = short_hash(job_id);
    format!("companies_{dataset}--{hash}.{extension}")
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
