use gltf_ior::gltf::{GltfLoader, LoaderOptions};

fn main() {
    macro_rules! help {
        () => {{
            eprintln!("Usage: <bin> src.gltf [OPTIONAL options_json]");
            return;
        }};
    }
    tracing_subscriber::fmt::init();

    let mut src = None;
    let mut options = None;
    for v in std::env::args().skip(1) {
        if matches!(v.as_str(), "-h" | "--help") {
            help!();
        }
        if src.is_none() {
            src = Some(v);
        } else if options.is_none() {
            options = Some(v)
        } else {
            help!();
        };
    }
    let Some(src) = src else {
        help!();
    };
    if src.starts_with("-") {
        help!();
    }

    let options = match options {
        None => LoaderOptions::default(),
        Some(p) => LoaderOptions::load_from_file(&p).expect("Failed to load options"),
    };
    println!("[INFO]: Materials of {src}:");
    let loader = GltfLoader::open(&src)
        .expect("Failed to open input")
        .with_options(options);
    let materials = loader.load_materials().expect("Failed to load materials");
    println!("#Materials = {}", materials.len());
    for (i, m) in materials.iter().enumerate() {
        let s = m.surface();
        match m.as_ior() {
            Some(ior) => println!("{i}: {:?} ior = {}", s.name, ior.index_of_refraction()),
            None => println!("{i}: {:?} (no ior)", s.name),
        }
    }
}
