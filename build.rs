pub fn main() {
    // 只有固件构建需要链接脚本，宿主机测试不需要
    if std::env::var_os("CARGO_FEATURE_FIRMWARE").is_none() {
        return;
    }

    // defmt 配置
    println!("cargo:rerun-if-env-changed=DEFMT_LOG");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
}
