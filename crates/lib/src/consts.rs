/// Root directory under which per-target build directories are created.
pub const DEFAULT_BUILD_ROOT: &str = "build";

/// File name of the configure log inside a build directory.
pub const CONFIGURE_LOG: &str = "cmake.log";

/// File name of the build log inside a build directory.
pub const BUILD_LOG: &str = "build.log";

/// Build description file the configure step must produce.
pub const BUILD_DESCRIPTION: &str = "Makefile";

/// Project file that marks a directory as configurable.
pub const PROJECT_FILE: &str = "CMakeLists.txt";

/// Extension of compiled object files collected into the archive.
pub const OBJECT_EXT: &str = "o";

/// Extension of static library archives.
pub const ARCHIVE_EXT: &str = "a";

/// Selector value that builds every configured target.
pub const SELECT_ALL: &str = "all";
