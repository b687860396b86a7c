use std::path::{Path, PathBuf};

pub const RC_FILE_NAME: &str = ".smallshrc";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: PathBuf,
}

impl ConfigPaths {
    /// `None` when there is no home directory to look in.
    pub fn new() -> Option<Self> {
        dirs::home_dir().map(|home| Self::from_home(&home))
    }

    pub fn from_home(home: &Path) -> Self {
        ConfigPaths {
            rc_path: home.join(RC_FILE_NAME),
        }
    }
}
