use std::env;

fn main() {
    let version =
        env::var("FRUITAI_VERSION").unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=FRUITAI_VERSION={version}");
    println!("cargo:rerun-if-env-changed=FRUITAI_VERSION");
}
