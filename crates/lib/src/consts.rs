//! Fixed, target-specific data for the Kobo build chain.
//!
//! Everything here is configuration data, not control flow: the package
//! chain, the link table, and the exclusion defaults are consumed by the
//! sequencer and link step but can be replaced wholesale in tests.

/// Name of the per-package target patch file.
pub const PATCH_FILE_NAME: &str = "kobo.patch";

/// Platform identifier forwarded to every package build.
pub const DEFAULT_PLATFORM: &str = "kobo";

/// Build-kind used when the caller does not specify one.
pub const DEFAULT_BUILD_KIND: &str = "release";

/// Name of the build output directory inside each package tree.
/// Object files land under `<package>/build/<build-kind>/`.
pub const BUILD_DIR_NAME: &str = "build";

/// Soname and output file name of the final artifact.
pub const RENDERER_SONAME: &str = "libmupdf.so";

/// The package whose object tree feeds the final link.
pub const RENDERER_PACKAGE: &str = "mupdf";

/// Cross toolchain prefix, overridable via `CROSS_COMPILE`.
pub const DEFAULT_CROSS_PREFIX: &str = "arm-linux-gnueabihf-";

/// The fixed dependency-ordered package chain. A package never appears
/// before one of its dependencies; the renderer is last.
pub const PACKAGE_CHAIN: &[&str] = &[
  "zlib",
  "libpng",
  "libjpeg",
  "openjpeg",
  "jbig2dec",
  "freetype",
  "harfbuzz",
  "mupdf",
];

/// External libraries linked into the artifact, in link order, each with
/// its search path relative to the renderer package directory. The paths
/// point into sibling package build trees, so the artifact can only link
/// after those packages have built.
pub const LINK_LIBRARIES: &[(&str, &str)] = &[
  ("z", "../zlib"),
  ("jpeg", "../libjpeg/.libs"),
  ("jbig2dec", "../jbig2dec/.libs"),
  ("openjp2", "../openjpeg/build/bin"),
  ("freetype", "../freetype/objs/.libs"),
  ("harfbuzz", "../harfbuzz/src/.libs"),
];

/// Object file name fragments excluded from the final link. A generic
/// renderer build bakes bundled CJK/fallback font tables and the lcms
/// color-management engine into objects the device build must not carry.
pub const RENDERER_EXCLUDES: &[&str] = &["SourceHanSerif", "DroidSansFallback", "color-lcms"];
