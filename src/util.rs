use std::path::Path;

/// File formats supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// GLTF JSON Format (.gltf)
    GLTF,
    /// GLTF Binary Format (.glb)
    GLB,

    /// Other unsupported file formats
    Unknown,
}

/// Given something that looks like a path parse it into a FileFormat.
pub fn extension_to_format(s: impl AsRef<Path>) -> FileFormat {
    let s = s.as_ref();
    let Some(e) = s.extension() else {
        return FileFormat::Unknown;
    };
    let Some(e) = e.to_str() else {
        return FileFormat::Unknown;
    };

    let matches = [("gltf", FileFormat::GLTF), ("glb", FileFormat::GLB)];
    for (ext, fmt) in matches {
        if ext.eq_ignore_ascii_case(e) {
            return fmt;
        }
    }
    FileFormat::Unknown
}

#[test]
fn test_extension_to_format() {
    assert_eq!(extension_to_format("a/b.gltf"), FileFormat::GLTF);
    assert_eq!(extension_to_format("B.GLB"), FileFormat::GLB);
    assert_eq!(extension_to_format("mesh.obj"), FileFormat::Unknown);
    assert_eq!(extension_to_format("noext"), FileFormat::Unknown);
}
