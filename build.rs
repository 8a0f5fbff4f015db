use std::env;

fn main() {
    // Version string used in the user agent and the CLI banner
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let version = match env::var("ROUTE_PICKER_BUILD_TAG") {
        Ok(tag) if !tag.is_empty() => format!("{version}+{tag}"),
        _ => version,
    };
    println!("cargo:rustc-env=ROUTE_PICKER_VERSION={version}");

    println!("cargo:rerun-if-env-changed=ROUTE_PICKER_BUILD_TAG");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
