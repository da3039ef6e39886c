fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // Pass through the commit hash when building outside a git checkout
    println!("cargo:rerun-if-env-changed=AUTO_REQUEST_REVIEW_GIT_HASH");
    if let Ok(hash) = std::env::var("AUTO_REQUEST_REVIEW_GIT_HASH") {
        println!("cargo:rustc-env=AUTO_REQUEST_REVIEW_GIT_HASH={}", hash);
    }
}
