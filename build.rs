fn main() {
    println!("cargo:rerun-if-changed=resources/windows/mousecross.rc");
    println!("cargo:rerun-if-changed=resources/windows/mousecross.manifest");

    // Only compile Windows resources on Windows target
    #[cfg(target_os = "windows")]
    {
        // Version info + application manifest (per-monitor DPI awareness)
        let _ = embed_resource::compile("resources/windows/mousecross.rc", embed_resource::NONE);
    }
}
